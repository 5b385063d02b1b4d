//! Caller controlled frequency band selection.
use log::{debug, error};

use crate::code::ObsCode;
use crate::constants::Constants;
use crate::constellation::Constellation;
use crate::signal;

/// Per conversion band selection: for each constellation, the
/// ordered set of logical bands the caller wants retained.
/// Configured from "+" separated canonical band names and
/// passed explicitly through decoding and re-encoding.
///
/// ```
/// use msm4::prelude::{Constellation, FreqSelection};
///
/// let mut selection = FreqSelection::new();
/// selection.select(Constellation::GPS, "L1+L2");
/// selection.select(Constellation::BeiDou, "B1I+B2I+B3I");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FreqSelection {
    /// Number of selected bands per constellation
    num: [usize; 7],
    /// Logical band to output slot, NFREQ when not selected
    slots: [[usize; Constants::NFREQ]; 7],
}

impl Default for FreqSelection {
    /// Nothing selected: every signal of every constellation
    /// is dropped.
    fn default() -> Self {
        Self {
            num: [0; 7],
            slots: [[Constants::NFREQ; Constants::NFREQ]; 7],
        }
    }
}

impl FreqSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from one band list per constellation,
    /// indexed GPS, Glonass, Galileo, QZSS, SBAS, BeiDou, IRNSS.
    /// An empty list drops the entire constellation.
    pub fn from_bands(bands: [&str; 7]) -> Self {
        let mut selection = Self::new();
        for (c, list) in [
            Constellation::GPS,
            Constellation::Glonass,
            Constellation::Galileo,
            Constellation::QZSS,
            Constellation::SBAS,
            Constellation::BeiDou,
            Constellation::IRNSS,
        ]
        .into_iter()
        .zip(bands.into_iter())
        {
            selection.select(c, list);
        }
        selection
    }

    /// (Re)defines the selected bands of one constellation,
    /// in caller order: `"G1+G2"`, `"B1I+B3I"`, .. Band names
    /// not known to this constellation are dropped silently.
    pub fn select(&mut self, c: Constellation, bands: &str) {
        let ci = c.index();
        self.num[ci] = 0;
        self.slots[ci] = [Constants::NFREQ; Constants::NFREQ];

        for token in bands.split('+') {
            if token.is_empty() {
                continue;
            }
            match signal::band_name_ordinal(c, token) {
                Some(band) if self.num[ci] < Constants::NFREQ => {
                    self.slots[ci][band] = self.num[ci];
                    self.num[ci] += 1;
                },
                Some(_) => {},
                None => {
                    debug!("{}: unknown band \"{}\"", c, token);
                },
            }
        }
    }

    /// Number of bands selected for this constellation: the
    /// encoder emits output slots 0..num only.
    pub(crate) fn num(&self, c: Constellation) -> usize {
        self.num[c.index()]
    }

    /// Output slot of a logical band, NFREQ when the band is
    /// not selected.
    pub(crate) fn slot(&self, c: Constellation, band: usize) -> usize {
        self.slots[c.index()][band]
    }

    /// Assigns one output slot to each signal of a message.
    ///
    /// Signals of selected bands compete for the band's primary
    /// slot: the highest code priority keeps it and displaces the
    /// previous winner into the extended slots. Signals of
    /// unselected bands go extended directly. Extended slots are
    /// handed out in first seen order; once exhausted the signal
    /// is dropped (None).
    pub(crate) fn signal_slots(&self, c: Constellation, codes: &[ObsCode]) -> Vec<Option<usize>> {
        let mut slots: Vec<Option<usize>> = codes
            .iter()
            .map(|code| match code {
                ObsCode::Unknown => None,
                code => signal::band_ordinal(c, *code).map(|band| self.slot(c, band)),
            })
            .collect();

        let mut extended = vec![false; codes.len()];
        let mut best_pri = [0_u8; Constants::NFREQ];
        let mut winner = [None::<usize>; Constants::NFREQ];

        for (i, slot) in slots.iter().enumerate() {
            let slot = match slot {
                Some(slot) => *slot,
                None => continue,
            };
            if slot >= Constants::NFREQ {
                // band not selected
                extended[i] = true;
                continue;
            }
            let pri = signal::code_priority(c, codes[i]);
            if pri > best_pri[slot] {
                if let Some(prev) = winner[slot] {
                    extended[prev] = true;
                }
                best_pri[slot] = pri;
                winner[slot] = Some(i);
            } else {
                extended[i] = true;
            }
        }

        let mut nex = 0;
        for (i, ext) in extended.iter().enumerate() {
            if !*ext {
                continue;
            }
            if nex < Constants::NEXOBS {
                slots[i] = Some(Constants::NFREQ + nex);
                nex += 1;
            } else {
                error!("msm: no slot left for {} signal {}", c, codes[i]);
                slots[i] = None;
            }
        }
        slots
    }
}
