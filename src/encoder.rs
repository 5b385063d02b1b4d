//! MSM4 message re-encoding.
use log::{debug, warn};

use crate::bits;
use crate::checksum::crc24q;
use crate::constants::Constants;
use crate::constellation::Constellation;
use crate::observation::{LliFlags, ObsSet};
use crate::selection::FreqSelection;
use crate::signal;
use crate::Error;

/// Bit offset of the multiple message bit within the header
const SYNC_BIT_OFFSET: usize = 78;

/// Bit offset of the satellite mask: 24 bit framing + 12 bit
/// type + 12 bit station id + 30 bit epoch + 1 bit sync +
/// 18 bits of session fields
const MASKS_BIT_OFFSET: usize = 97;

/// Header bytes copied verbatim from the input frame (framing,
/// type, station id, epoch, sync, session fields)
const HEADER_PREFIX_LEN: usize = 13;

fn round(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn round_u(value: f64) -> u32 {
    (value + 0.5).floor() as u32
}

/// Regenerated satellite, signal and cell masks, restricted to
/// the selected output slots.
struct MsmIndex {
    nsat: usize,
    nsig: usize,
    ncell: usize,
    /// Satellite id to 1..=nsat ordinal, 0 when absent
    sat_ind: [u8; 64],
    /// Signal id to 1..=nsig ordinal, 0 when absent
    sig_ind: [u8; 32],
    /// Satellite major cell ordinals, 0 when masked out
    cell_ind: Vec<u8>,
}

/// Walks the store and rebuilds the three masks from the
/// surviving (satellite, signal) pairs.
fn gen_index(c: Constellation, obs: &ObsSet, selection: &FreqSelection) -> MsmIndex {
    let mut index = MsmIndex {
        nsat: 0,
        nsig: 0,
        ncell: 0,
        sat_ind: [0; 64],
        sig_ind: [0; 32],
        cell_ind: Vec::new(),
    };

    for rec in obs.records() {
        let sat_id = match c.msm_sat_id(rec.sat) {
            Some(sat_id) => sat_id,
            None => continue,
        };
        for j in 0..selection.num(c) {
            let sig_id = signal::msm_signal_id(c, rec.code[j]);
            if sig_id == 0 {
                continue;
            }
            index.sat_ind[sat_id as usize - 1] = 1;
            index.sig_ind[sig_id as usize - 1] = 1;
        }
    }
    for ind in index.sat_ind.iter_mut() {
        if *ind != 0 {
            index.nsat += 1;
            *ind = index.nsat as u8;
        }
    }
    for ind in index.sig_ind.iter_mut() {
        if *ind != 0 {
            index.nsig += 1;
            *ind = index.nsig as u8;
        }
    }

    index.cell_ind = vec![0; index.nsat * index.nsig];
    for rec in obs.records() {
        let sat_id = match c.msm_sat_id(rec.sat) {
            Some(sat_id) => sat_id,
            None => continue,
        };
        for j in 0..selection.num(c) {
            let sig_id = signal::msm_signal_id(c, rec.code[j]);
            if sig_id == 0 {
                continue;
            }
            let sat_ord = index.sat_ind[sat_id as usize - 1] as usize;
            let sig_ord = index.sig_ind[sig_id as usize - 1] as usize;
            index.cell_ind[(sat_ord - 1) * index.nsig + (sig_ord - 1)] = 1;
        }
    }
    for ind in index.cell_ind.iter_mut() {
        if *ind != 0 && index.ncell < 64 {
            index.ncell += 1;
            *ind = index.ncell as u8;
        }
    }
    index
}

/// Glonass channel (fcn) of a satellite, None for other
/// constellations or unknown channels.
fn fcn_glo(sat: u16) -> Option<i8> {
    match Constellation::from_sat_number(sat) {
        Some((Constellation::Glonass, prn)) => signal::glo_fcn(prn),
        _ => None,
    }
}

/// Generates the rough range (m) and rough phase-range-rate
/// (m/s) of each masked satellite, from the first slot carrying
/// a value.
fn gen_sat_fields(
    c: Constellation,
    obs: &ObsSet,
    selection: &FreqSelection,
    index: &MsmIndex,
) -> ([f64; 64], [f64; 64]) {
    let mut rrng = [0.0_f64; 64];
    let mut rrate = [0.0_f64; 64];

    for rec in obs.records() {
        let sat_id = match c.msm_sat_id(rec.sat) {
            Some(sat_id) => sat_id,
            None => continue,
        };
        let fcn = fcn_glo(rec.sat);

        for j in 0..selection.num(c) {
            if signal::msm_signal_id(c, rec.code[j]) == 0 {
                continue;
            }
            let k = index.sat_ind[sat_id as usize - 1] as usize - 1;
            let freq = signal::carrier_frequency(c, rec.code[j], fcn);

            if rrng[k] == 0.0 && rec.pseudo_range_m[j] != 0.0 {
                rrng[k] = round(rec.pseudo_range_m[j] / Constants::RANGE_MS / Constants::P2_10)
                    as f64
                    * Constants::RANGE_MS
                    * Constants::P2_10;
            }
            if rrate[k] == 0.0 && rec.doppler_hz[j] != 0.0 && freq > 0.0 {
                rrate[k] = round(-rec.doppler_hz[j] * Constants::C_LIGHT / freq) as f64;
            }
        }
    }
    (rrng, rrate)
}

/// Per cell signal fields: fine pseudorange and phase-range
/// residuals (m), lock time indicators, half cycle flags and
/// CNR (dBHz).
struct SignalFields {
    psrng: [f64; 64],
    phrng: [f64; 64],
    lock: [u8; 64],
    half: [u8; 64],
    cnr: [f64; 64],
}

fn gen_sig_fields(
    c: Constellation,
    obs: &ObsSet,
    selection: &FreqSelection,
    index: &MsmIndex,
    rrng: &[f64; 64],
) -> SignalFields {
    let mut fields = SignalFields {
        psrng: [0.0; 64],
        phrng: [0.0; 64],
        lock: [0; 64],
        half: [0; 64],
        cnr: [0.0; 64],
    };

    for rec in obs.records() {
        let sat_id = match c.msm_sat_id(rec.sat) {
            Some(sat_id) => sat_id,
            None => continue,
        };
        let fcn = fcn_glo(rec.sat);

        for j in 0..selection.num(c) {
            let sig_id = signal::msm_signal_id(c, rec.code[j]);
            if sig_id == 0 {
                continue;
            }
            let k = index.sat_ind[sat_id as usize - 1] as usize - 1;
            let cell = index.cell_ind
                [k * index.nsig + index.sig_ind[sig_id as usize - 1] as usize - 1]
                as usize;
            if cell == 0 {
                continue;
            }

            let freq = signal::carrier_frequency(c, rec.code[j], fcn);
            let lambda = if freq == 0.0 {
                0.0
            } else {
                Constants::C_LIGHT / freq
            };

            let psrng_s = if rec.pseudo_range_m[j] == 0.0 {
                0.0
            } else {
                rec.pseudo_range_m[j] - rrng[k]
            };
            let phrng_s = if rec.phase_range_cyc[j] == 0.0 || lambda <= 0.0 {
                0.0
            } else {
                rec.phase_range_cyc[j] * lambda - rrng[k]
            };

            if psrng_s != 0.0 {
                fields.psrng[cell - 1] = psrng_s;
            }
            if phrng_s != 0.0 {
                fields.phrng[cell - 1] = phrng_s;
            }
            fields.lock[cell - 1] = rec.lock_time[j];
            fields.half[cell - 1] = rec.lli[j].contains(LliFlags::HALF_CYCLE_SLIP) as u8;
            fields.cnr[cell - 1] = rec.snr_mdbhz[j] as f64 * Constants::SNR_UNIT;
        }
    }
    fields
}

/// Rough range integer milliseconds: 8 bits per satellite,
/// 255 when unavailable or out of range.
fn write_int_rrng(buf: &mut [u8], mut i: usize, rrng: &[f64], nsat: usize) -> usize {
    for value in rrng.iter().take(nsat) {
        let int_ms = if *value == 0.0 {
            255
        } else if *value < 0.0 || *value > Constants::RANGE_MS * 255.0 {
            warn!("msm rough range overflow rrng={:.3}", value);
            255
        } else {
            round_u(*value / Constants::RANGE_MS / Constants::P2_10) >> 10
        };
        bits::set_unsigned(buf, i, 8, int_ms);
        i += 8;
    }
    i
}

/// Rough range modulo 1 ms: 10 bits per satellite.
fn write_mod_rrng(buf: &mut [u8], mut i: usize, rrng: &[f64], nsat: usize) -> usize {
    for value in rrng.iter().take(nsat) {
        let mod_ms = if *value <= 0.0 || *value > Constants::RANGE_MS * 255.0 {
            0
        } else {
            round_u(*value / Constants::RANGE_MS / Constants::P2_10) & 0x3FF
        };
        bits::set_unsigned(buf, i, 10, mod_ms);
        i += 10;
    }
    i
}

/// Fine pseudorange: signed 15 bits per cell, -16384 when the
/// residual is missing or exceeds the field.
fn write_psrng(buf: &mut [u8], mut i: usize, psrng: &[f64], ncell: usize) -> usize {
    for value in psrng.iter().take(ncell) {
        let psrng_val = if *value == 0.0 {
            -16384
        } else if value.abs() > 292.7 {
            warn!("msm fine pseudorange overflow psrng={:.3}", value);
            -16384
        } else {
            round(*value / Constants::RANGE_MS / Constants::P2_24)
        };
        bits::set_signed(buf, i, 15, psrng_val);
        i += 15;
    }
    i
}

/// Fine phase-range: signed 22 bits per cell, -2097152 when the
/// residual is missing or exceeds the field.
fn write_phrng(buf: &mut [u8], mut i: usize, phrng: &[f64], ncell: usize) -> usize {
    for value in phrng.iter().take(ncell) {
        let phrng_val = if *value == 0.0 {
            -2097152
        } else if value.abs() > 1171.0 {
            warn!("msm fine phase-range overflow phrng={:.3}", value);
            -2097152
        } else {
            round(*value / Constants::RANGE_MS / Constants::P2_29)
        };
        bits::set_signed(buf, i, 22, phrng_val);
        i += 22;
    }
    i
}

/// Re-encodes the observation store as one MSM4 frame in
/// `output`. The 13 header prefix bytes (type, station id,
/// epoch, session fields) are carried over from `input`, with
/// the multiple message bit overwritten by `sync`. Returns the
/// total frame length, parity included.
pub(crate) fn encode(
    c: Constellation,
    sync: u8,
    input: &[u8],
    obs: &ObsSet,
    selection: &FreqSelection,
    output: &mut [u8],
) -> Result<usize, Error> {
    if input.len() < HEADER_PREFIX_LEN {
        return Err(Error::NotEnoughBytes);
    }

    let index = gen_index(c, obs, selection);
    // MSM4 carries no phase-range-rates: rough rates stay unemitted
    let (rrng, _rrate) = gen_sat_fields(c, obs, selection, &index);
    let fields = gen_sig_fields(c, obs, selection, &index, &rrng);

    debug!(
        "encode msm4: type={} nsat={} nsig={} ncell={} sync={}",
        c.msm4_type(),
        index.nsat,
        index.nsig,
        index.ncell,
        sync,
    );

    let cell_bits = (index.nsat * index.nsig).min(64);
    let total_bits =
        MASKS_BIT_OFFSET + 64 + 32 + cell_bits + index.nsat * 18 + index.ncell * 48;
    let body_len = (total_bits + 7) / 8;

    // message length (header + data) must fit the 10 bit
    // length field contract
    if body_len >= 3 + Constants::MAX_PAYLOAD_LEN {
        warn!("generate rtcm3 message length error len={}", body_len - 3);
        return Err(Error::MessageLengthOverflow);
    }
    if body_len + 3 > output.len() {
        return Err(Error::NotEnoughBytes);
    }

    // header prefix travels verbatim, except the framing byte
    // and the sync bit
    output[..HEADER_PREFIX_LEN].copy_from_slice(&input[..HEADER_PREFIX_LEN]);
    output[0] = Constants::PREAMBLE;
    bits::set_unsigned(output, SYNC_BIT_OFFSET, 1, sync as u32);

    let mut i = MASKS_BIT_OFFSET;
    for ind in index.sat_ind.iter() {
        bits::set_unsigned(output, i, 1, (*ind != 0) as u32);
        i += 1;
    }
    for ind in index.sig_ind.iter() {
        bits::set_unsigned(output, i, 1, (*ind != 0) as u32);
        i += 1;
    }
    for ind in index.cell_ind.iter().take(cell_bits) {
        bits::set_unsigned(output, i, 1, (*ind != 0) as u32);
        i += 1;
    }

    // satellite data
    i = write_int_rrng(output, i, &rrng, index.nsat);
    i = write_mod_rrng(output, i, &rrng, index.nsat);

    // signal data
    i = write_psrng(output, i, &fields.psrng, index.ncell);
    i = write_phrng(output, i, &fields.phrng, index.ncell);
    for value in fields.lock.iter().take(index.ncell) {
        bits::set_unsigned(output, i, 4, *value as u32);
        i += 4;
    }
    for value in fields.half.iter().take(index.ncell) {
        bits::set_unsigned(output, i, 1, *value as u32);
        i += 1;
    }
    for value in fields.cnr.iter().take(index.ncell) {
        bits::set_unsigned(output, i, 6, round(*value) as u32);
        i += 6;
    }

    // pad up to the next byte boundary
    while i % 8 != 0 {
        bits::set_unsigned(output, i, 1, 0);
        i += 1;
    }

    // message length without framing nor parity
    bits::set_unsigned(output, 14, 10, (body_len - 3) as u32);

    let crc = crc24q(&output[..body_len]);
    bits::set_unsigned(output, body_len * 8, 24, crc);

    Ok(body_len + 3)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bits;

    fn header_prefix(msg_type: u16) -> [u8; 16] {
        let mut input = [0; 16];
        bits::set_unsigned(&mut input, 0, 8, Constants::PREAMBLE as u32);
        bits::set_unsigned(&mut input, 24, 12, msg_type as u32);
        bits::set_unsigned(&mut input, 36, 12, 1234); // station id
        bits::set_unsigned(&mut input, 48, 30, 345_600_000); // epoch
        input
    }

    #[test]
    fn empty_store() {
        let input = header_prefix(1074);
        let selection = FreqSelection::from_bands(["L1", "", "", "", "", "", ""]);
        let obs = ObsSet::new();

        let mut output = [0; 64];
        let size = encode(
            Constellation::GPS,
            1,
            &input,
            &obs,
            &selection,
            &mut output,
        )
        .unwrap();

        // masks only: 193 bits padded to 25 bytes, 3 parity bytes
        assert_eq!(size, 28);
        assert_eq!(output[0], Constants::PREAMBLE);
        assert_eq!(bits::get_unsigned(&output, 14, 10), 25 - 3);
        assert_eq!(bits::get_unsigned(&output, 24, 12), 1074);
        // station id and epoch carried over
        assert_eq!(bits::get_unsigned(&output, 36, 12), 1234);
        assert_eq!(bits::get_unsigned(&output, 48, 30), 345_600_000);
        assert_eq!(bits::get_unsigned(&output, 78, 1), 1);
        // empty masks
        assert_eq!(bits::get_unsigned(&output, 97, 32), 0);
        assert_eq!(bits::get_unsigned(&output, 129, 32), 0);
        assert_eq!(bits::get_unsigned(&output, 161, 32), 0);

        let crc = crc24q(&output[..size - 3]);
        assert_eq!(bits::get_unsigned(&output, (size - 3) * 8, 24), crc);
    }

    #[test]
    fn sync_bit_overwritten() {
        let mut input = header_prefix(1074);
        bits::set_unsigned(&mut input, 78, 1, 1);

        let selection = FreqSelection::new();
        let obs = ObsSet::new();

        let mut output = [0; 64];
        encode(
            Constellation::GPS,
            0,
            &input,
            &obs,
            &selection,
            &mut output,
        )
        .unwrap();
        assert_eq!(bits::get_unsigned(&output, 78, 1), 0);
    }

    #[test]
    fn output_capacity() {
        let input = header_prefix(1074);
        let mut output = [0; 16];
        assert!(matches!(
            encode(
                Constellation::GPS,
                0,
                &input,
                &ObsSet::new(),
                &FreqSelection::new(),
                &mut output,
            ),
            Err(Error::NotEnoughBytes),
        ));
    }

    #[test]
    fn rough_range_sentinels() {
        let mut buf = [0; 32];
        // unavailable and overflowing ranges emit 255 / 0
        let rrng = [0.0, Constants::RANGE_MS * 256.0, Constants::RANGE_MS * 73.5];
        let mut i = write_int_rrng(&mut buf, 0, &rrng, 3);
        i = write_mod_rrng(&mut buf, i, &rrng, 3);
        assert_eq!(i, 3 * 18);

        assert_eq!(bits::get_unsigned(&buf, 0, 8), 255);
        assert_eq!(bits::get_unsigned(&buf, 8, 8), 255);
        assert_eq!(bits::get_unsigned(&buf, 16, 8), 73);
        assert_eq!(bits::get_unsigned(&buf, 24, 10), 0);
        assert_eq!(bits::get_unsigned(&buf, 34, 10), 0);
        assert_eq!(bits::get_unsigned(&buf, 44, 10), 512);
    }

    #[test]
    fn fine_range_sentinels() {
        let mut buf = [0; 32];
        let psrng = [0.0, 300.0, -300.0, 100.0];
        write_psrng(&mut buf, 0, &psrng, 4);
        assert_eq!(bits::get_signed(&buf, 0, 15), -16384);
        assert_eq!(bits::get_signed(&buf, 15, 15), -16384);
        assert_eq!(bits::get_signed(&buf, 30, 15), -16384);
        assert_eq!(
            bits::get_signed(&buf, 45, 15),
            round(100.0 / Constants::RANGE_MS / Constants::P2_24),
        );

        let mut buf = [0; 32];
        let phrng = [0.0, 1200.0, 500.0];
        write_phrng(&mut buf, 0, &phrng, 3);
        assert_eq!(bits::get_signed(&buf, 0, 22), -2097152);
        assert_eq!(bits::get_signed(&buf, 22, 22), -2097152);
        assert_eq!(
            bits::get_signed(&buf, 44, 22),
            round(500.0 / Constants::RANGE_MS / Constants::P2_29),
        );
    }
}
