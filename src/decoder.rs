//! MSM4 message decoding.
use log::{error, warn};

use crate::bits;
use crate::code::ObsCode;
use crate::constants::Constants;
use crate::constellation::Constellation;
use crate::observation::{LliFlags, ObsSet};
use crate::selection::FreqSelection;
use crate::signal;
use crate::Error;

/// Multi signal message header: the satellite, signal and cell
/// masks describing which (satellite, signal) intersections the
/// payload carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MsmHeader {
    /// Message type (1074, 1084, ..)
    pub msg_type: u16,
    /// Multiple message bit: set when another message of the
    /// same epoch follows
    pub sync: u8,
    /// Masked in MSM satellite ids (1..=64), ascending
    pub sats: Vec<u8>,
    /// Masked in MSM signal ids (1..=32), ascending
    pub sigs: Vec<u8>,
    /// Cell mask, satellite major, sats.len() * sigs.len() bits
    pub cells: Vec<bool>,
}

impl MsmHeader {
    /// Number of (satellite, signal) cells the payload carries.
    pub fn ncell(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }
}

/// Parses the MSM header. Returns the header and the bit offset
/// of the first payload field.
fn decode_header(buf: &[u8]) -> Result<(MsmHeader, usize), Error> {
    let len_bits = buf.len() * 8;
    let mut i = 24;

    if i + 12 > len_bits {
        return Err(Error::NotEnoughBytes);
    }
    let msg_type = bits::get_unsigned(buf, i, 12) as u16;
    i += 12;

    // station id .. signal mask take 157 bits
    if i + 157 > len_bits {
        error!("rtcm3 {} length error: len={}", msg_type, buf.len());
        return Err(Error::NotEnoughBytes);
    }

    i += 12; // station id, passed through opaquely
    i += 30; // epoch, passed through opaquely

    let sync = bits::get_unsigned(buf, i, 1) as u8;
    i += 1;

    // iod, session time, clock steering, external clock,
    // smoothing indicator and interval
    i += 3 + 7 + 2 + 2 + 1 + 3;

    let mut header = MsmHeader {
        msg_type,
        sync,
        ..Default::default()
    };

    for j in 1..=64_u8 {
        if bits::get_unsigned(buf, i, 1) != 0 {
            header.sats.push(j);
        }
        i += 1;
    }
    for j in 1..=32_u8 {
        if bits::get_unsigned(buf, i, 1) != 0 {
            header.sigs.push(j);
        }
        i += 1;
    }

    let ncells = header.sats.len() * header.sigs.len();
    if ncells > 64 {
        error!(
            "rtcm3 {} number of sats and sigs error: nsat={} nsig={}",
            msg_type,
            header.sats.len(),
            header.sigs.len(),
        );
        return Err(Error::InvalidMaskLayout);
    }
    if i + ncells > len_bits {
        error!(
            "rtcm3 {} length error: len={} nsat={} nsig={}",
            msg_type,
            buf.len(),
            header.sats.len(),
            header.sigs.len(),
        );
        return Err(Error::NotEnoughBytes);
    }
    for _ in 0..ncells {
        header.cells.push(bits::get_unsigned(buf, i, 1) != 0);
        i += 1;
    }

    Ok((header, i))
}

/// Decodes one MSM4 message (full pseudorange, phaserange and
/// CNR) into per satellite observation records. `selection`
/// drives slot placement: retained bands land on the primary
/// slots, everything else goes extended.
pub fn decode(
    c: Constellation,
    buf: &[u8],
    selection: &FreqSelection,
) -> Result<(MsmHeader, ObsSet), Error> {
    let (header, mut i) = decode_header(buf)?;

    let nsat = header.sats.len();
    let ncell = header.ncell();

    if i + nsat * 18 + ncell * 48 > buf.len() * 8 {
        error!(
            "rtcm3 {} length error: nsat={} ncell={} len={}",
            header.msg_type,
            nsat,
            ncell,
            buf.len(),
        );
        return Err(Error::NotEnoughBytes);
    }

    let mut r = vec![0.0_f64; nsat];
    let mut pr = vec![-1E16_f64; ncell];
    let mut cp = vec![-1E16_f64; ncell];
    let mut lock = vec![0_u8; ncell];
    let mut half = vec![0_u8; ncell];
    let mut cnr = vec![0.0_f64; ncell];

    // satellite data
    for value in r.iter_mut() {
        // rough range integer ms, 255 when unavailable
        let rng = bits::get_unsigned(buf, i, 8);
        i += 8;
        if rng != 255 {
            *value = rng as f64 * Constants::RANGE_MS;
        }
    }
    for value in r.iter_mut() {
        let rng_m = bits::get_unsigned(buf, i, 10);
        i += 10;
        if *value != 0.0 {
            *value += rng_m as f64 * Constants::P2_10 * Constants::RANGE_MS;
        }
    }
    // signal data
    for value in pr.iter_mut() {
        // fine pseudorange
        let prv = bits::get_signed(buf, i, 15);
        i += 15;
        if prv != -16384 {
            *value = prv as f64 * Constants::P2_24 * Constants::RANGE_MS;
        }
    }
    for value in cp.iter_mut() {
        // fine phase-range
        let cpv = bits::get_signed(buf, i, 22);
        i += 22;
        if cpv != -2097152 {
            *value = cpv as f64 * Constants::P2_29 * Constants::RANGE_MS;
        }
    }
    for value in lock.iter_mut() {
        *value = bits::get_unsigned(buf, i, 4) as u8;
        i += 4;
    }
    for value in half.iter_mut() {
        *value = bits::get_unsigned(buf, i, 1) as u8;
        i += 1;
    }
    for value in cnr.iter_mut() {
        *value = bits::get_unsigned(buf, i, 6) as f64;
        i += 6;
    }

    let mut obs = ObsSet::new();

    // signal id to observation code
    let codes: Vec<ObsCode> = header
        .sigs
        .iter()
        .map(|sig_id| {
            let code = signal::msm_signal(c, *sig_id);
            if code == ObsCode::Unknown {
                error!("rtcm3 {}: unknown signal id={}", header.msg_type, sig_id);
            }
            code
        })
        .collect();

    let slots = selection.signal_slots(c, &codes);
    let nsig = header.sigs.len();

    let mut j = 0; // cell cursor
    for (s, sat_id) in header.sats.iter().enumerate() {
        let prn = c.msm_prn(*sat_id);

        let sat = c.sat_number(prn);
        match sat {
            Some(sat) => {
                // one record per satellite, even when every cell
                // of this row ends up dropped
                if obs.record_mut(sat).is_none() {
                    warn!("rtcm3 {}: obs overflow", header.msg_type);
                }
            },
            None => {
                warn!("rtcm3 {} satellite error: prn={}", header.msg_type, prn);
            },
        }

        let fcn = match c {
            Constellation::Glonass => signal::glo_fcn(prn),
            _ => None,
        };

        for k in 0..nsig {
            if !header.cells[k + s * nsig] {
                continue;
            }
            if let (Some(sat), Some(slot)) = (sat, slots[k]) {
                if let Some(rec) = obs.record_mut(sat) {
                    let freq = signal::carrier_frequency(c, codes[k], fcn);

                    // pseudo range (m)
                    if r[s] != 0.0 && pr[j] > -1E12 {
                        rec.pseudo_range_m[slot] = r[s] + pr[j];
                    }
                    // carrier phase (cycles)
                    if r[s] != 0.0 && cp[j] > -1E12 {
                        rec.phase_range_cyc[slot] = (r[s] + cp[j]) * freq / Constants::C_LIGHT;
                    }
                    let mut lli = LliFlags::empty();
                    if lock[j] == 0 {
                        lli |= LliFlags::LOCK_LOSS;
                    }
                    if half[j] != 0 {
                        lli |= LliFlags::HALF_CYCLE_SLIP;
                    }
                    rec.lli[slot] = lli;
                    rec.snr_mdbhz[slot] = (cnr[j] / Constants::SNR_UNIT + 0.5) as u32;
                    rec.code[slot] = codes[k];
                    rec.lock_time[slot] = lock[j];
                }
            }
            j += 1;
        }
    }

    Ok((header, obs))
}

#[cfg(test)]
mod test {
    use super::*;

    fn selection_l1() -> FreqSelection {
        FreqSelection::from_bands(["L1", "", "", "", "", "", ""])
    }

    #[test]
    fn truncated_header() {
        let buf = [0xD3, 0x00, 0x10, 0x43];
        assert!(matches!(
            decode(Constellation::GPS, &buf, &selection_l1()),
            Err(Error::NotEnoughBytes),
        ));

        // full masks need 25 bytes minimum
        let mut buf = [0; 24];
        bits::set_unsigned(&mut buf, 0, 8, 0xD3);
        bits::set_unsigned(&mut buf, 24, 12, 1074);
        assert!(matches!(
            decode(Constellation::GPS, &buf, &selection_l1()),
            Err(Error::NotEnoughBytes),
        ));
    }

    #[test]
    fn mask_layout_bound() {
        // 9 satellites x 8 signals = 72 cells > 64
        let mut buf = [0; 64];
        bits::set_unsigned(&mut buf, 0, 8, 0xD3);
        bits::set_unsigned(&mut buf, 24, 12, 1074);
        for j in 0..9 {
            bits::set_unsigned(&mut buf, 97 + j, 1, 1);
        }
        for j in 0..8 {
            bits::set_unsigned(&mut buf, 161 + j, 1, 1);
        }
        assert!(matches!(
            decode(Constellation::GPS, &buf, &selection_l1()),
            Err(Error::InvalidMaskLayout),
        ));
    }

    #[test]
    fn single_cell() {
        let mut buf = [0; 40];
        bits::set_unsigned(&mut buf, 0, 8, 0xD3);
        bits::set_unsigned(&mut buf, 24, 12, 1074);
        bits::set_unsigned(&mut buf, 78, 1, 1); // sync
        bits::set_unsigned(&mut buf, 97 + 4, 1, 1); // satellite 5
        bits::set_unsigned(&mut buf, 161 + 1, 1, 1); // signal 2: "1C"
        bits::set_unsigned(&mut buf, 193, 1, 1); // cell

        let mut i = 194;
        bits::set_unsigned(&mut buf, i, 8, 100); // integer ms
        i += 8;
        bits::set_unsigned(&mut buf, i, 10, 512); // rough modulo
        i += 10;
        bits::set_signed(&mut buf, i, 15, 100); // fine pseudorange
        i += 15;
        bits::set_signed(&mut buf, i, 22, 200); // fine phaserange
        i += 22;
        bits::set_unsigned(&mut buf, i, 4, 5); // lock
        i += 4;
        bits::set_unsigned(&mut buf, i, 1, 1); // half cycle
        i += 1;
        bits::set_unsigned(&mut buf, i, 6, 30); // cnr

        let (header, obs) = decode(Constellation::GPS, &buf, &selection_l1()).unwrap();
        assert_eq!(header.msg_type, 1074);
        assert_eq!(header.sync, 1);
        assert_eq!(header.sats, vec![5]);
        assert_eq!(header.sigs, vec![2]);
        assert_eq!(header.ncell(), 1);

        assert_eq!(obs.len(), 1);
        let rec = &obs.records()[0];
        assert_eq!(rec.sat, 5);
        assert_eq!(rec.code[0], ObsCode::L1C);

        let r = (100.0 + 512.0 * Constants::P2_10) * Constants::RANGE_MS;
        let pr = 100.0 * Constants::P2_24 * Constants::RANGE_MS;
        let cp = 200.0 * Constants::P2_29 * Constants::RANGE_MS;
        assert!((rec.pseudo_range_m[0] - (r + pr)).abs() < 1E-9);
        let cycles = (r + cp) * Constants::FREQ1 / Constants::C_LIGHT;
        assert!((rec.phase_range_cyc[0] - cycles).abs() < 1E-9);

        assert_eq!(rec.snr_mdbhz[0], 30_000);
        assert_eq!(rec.lock_time[0], 5);
        assert_eq!(rec.lli[0], LliFlags::HALF_CYCLE_SLIP);
    }

    #[test]
    fn invalid_rough_range_drops_cell() {
        let mut buf = [0; 40];
        bits::set_unsigned(&mut buf, 0, 8, 0xD3);
        bits::set_unsigned(&mut buf, 24, 12, 1074);
        bits::set_unsigned(&mut buf, 97, 1, 1); // satellite 1
        bits::set_unsigned(&mut buf, 161 + 1, 1, 1); // signal 2: "1C"
        bits::set_unsigned(&mut buf, 193, 1, 1); // cell

        let mut i = 194;
        bits::set_unsigned(&mut buf, i, 8, 255); // range unavailable
        i += 8;
        bits::set_unsigned(&mut buf, i, 10, 512);
        i += 10;
        bits::set_signed(&mut buf, i, 15, 100);

        let (_, obs) = decode(Constellation::GPS, &buf, &selection_l1()).unwrap();
        let rec = &obs.records()[0];
        assert_eq!(rec.pseudo_range_m[0], 0.0);
        assert_eq!(rec.phase_range_cyc[0], 0.0);
        // cell was present: code and flags still recorded
        assert_eq!(rec.code[0], ObsCode::L1C);
    }
}
