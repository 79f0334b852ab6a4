//! # Fret Geometry
//!
//! Closed-form fret placement for an equal division of the octave:
//!
//! ```text
//! position(n) = scale_length * (1 - 2^(-n / edo))
//! ```
//!
//! Fret `n` sits where the remaining string length is `2^(-n/edo)` of the full scale,
//! so `edo` frets raise the pitch by exactly one octave. Positions start at the nut
//! (`position(0) == 0`), increase strictly, and approach `scale_length` without ever
//! reaching it. Generation stops before the first fret at or past `fretboard_length`,
//! which [`TuningConfig`] guarantees is shorter than the scale.

use crate::config::TuningConfig;
use crate::Fret;
use std::iter::FusedIterator;

/// Distance from the nut to fret `n`, in the units of `scale_length`.
pub fn fret_position(n: usize, edo: f64, scale_length: f64) -> f64 {
    scale_length * (1.0 - 2f64.powf(-(n as f64) / edo))
}

/// Lazy `(index, position)` sequence covering `[0, fretboard_length)`.
///
/// Cloning yields an independent iterator, so a sequence can be replayed from any point.
#[derive(Debug, Clone)]
pub struct FretPositions {
    edo: f64,
    scale_length: f64,
    fretboard_length: f64,
    next: usize,
    done: bool,
}

impl FretPositions {
    pub fn new(config: &TuningConfig) -> Self {
        FretPositions {
            edo: config.edo(),
            scale_length: config.scale_length(),
            fretboard_length: config.fretboard_length(),
            next: 0,
            done: false,
        }
    }
}

impl Iterator for FretPositions {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let position = fret_position(self.next, self.edo, self.scale_length);
        if position >= self.fretboard_length {
            self.done = true;
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some((index, position))
    }
}

impl FusedIterator for FretPositions {}

/// Target-tuning frets, with lateral offsets when the neck is tapered.
pub fn target_frets(config: &TuningConfig) -> Vec<Fret> {
    FretPositions::new(config)
        .map(|(index, position)| {
            let lateral_offset = config.taper().map_or(0.0, |taper| {
                taper.lateral_offset(position, config.fretboard_length(), config.scale_length())
            });
            Fret {
                index,
                position,
                lateral_offset,
            }
        })
        .collect()
}

/// 12-EDO reference frets over the same neck. Reference lines carry no offset.
pub fn reference_frets(config: &TuningConfig) -> Vec<Fret> {
    FretPositions::new(&config.reference())
        .map(|(index, position)| Fret {
            index,
            position,
            lateral_offset: 0.0,
        })
        .collect()
}
