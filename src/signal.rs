//! Static signal catalog: MSM signal ids, code priorities,
//! canonical band names and carrier frequency resolution.
use crate::code::ObsCode;
use crate::constants::Constants;
use crate::constellation::Constellation;

/// GPS MSM signal ids (slots 1-32)
const MSM_SIG_GPS: [&str; 32] = [
    "", "1C", "1P", "1W", "", "", "", "2C", "2P", "2W", "", "", /*  1-12 */
    "", "", "2S", "2L", "2X", "", "", "", "", "5I", "5Q", "5X", /* 13-24 */
    "", "", "", "", "", "1S", "1L", "1X", /* 25-32 */
];

/// Glonass MSM signal ids
const MSM_SIG_GLO: [&str; 32] = [
    "", "1C", "1P", "", "", "", "", "2C", "2P", "", "", "", "", "", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "", "", "",
];

/// Galileo MSM signal ids
const MSM_SIG_GAL: [&str; 32] = [
    "", "1C", "1A", "1B", "1X", "1Z", "", "6C", "6A", "6B", "6X", "6Z", "", "7I", "7Q", "7X", "",
    "8I", "8Q", "8X", "", "5I", "5Q", "5X", "", "", "", "", "", "", "", "",
];

/// QZSS MSM signal ids
const MSM_SIG_QZS: [&str; 32] = [
    "", "1C", "", "", "", "", "", "", "6S", "6L", "6X", "", "", "", "2S", "2L", "2X", "", "", "",
    "", "5I", "5Q", "5X", "", "", "", "", "", "1S", "1L", "1X",
];

/// SBAS MSM signal ids
const MSM_SIG_SBS: [&str; 32] = [
    "", "1C", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "5I",
    "5Q", "5X", "", "", "", "", "", "", "", "",
];

/// BeiDou MSM signal ids
const MSM_SIG_CMP: [&str; 32] = [
    "", "2I", "2Q", "2X", "", "", "", "6I", "6Q", "6X", "", "", "", "7I", "7Q", "7X", "", "", "",
    "", "", "5D", "5P", "5X", "7D", "", "", "", "", "1D", "1P", "1X",
];

/// IRNSS MSM signal ids
const MSM_SIG_IRN: [&str; 32] = [
    "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "5A", "",
    "", "", "", "", "", "", "", "", "",
];

/// Code priority per (constellation, logical band): attribute
/// characters listed by decreasing preference. Priority is
/// 14 - position, 0 when absent.
const CODE_PRIORITIES: [[&str; Constants::NFREQ]; 7] = [
    ["CPYWMNSLX", "PYWCMNDLSX", "IQX", "", "", "", ""], /* GPS */
    ["CPABX", "CPABX", "IQX", "CPABX", "CPABX", "", ""], /* GLO */
    ["CABXZ", "IQX", "IQX", "ABCXZ", "IQX", "", ""],    /* GAL */
    ["CLSXZ", "LSX", "IQXDPZ", "LSXEZ", "", "", ""],    /* QZS */
    ["C", "IQX", "", "", "", "", ""],                   /* SBS */
    ["IQXDPAN", "IQXDPZ", "DPX", "DPX", "DPX", "IQX", "DPZX"], /* BDS */
    ["ABCX", "ABCX", "", "", "", "", ""],               /* IRN */
];

/// Canonical band names per constellation, in logical band order.
const BAND_NAMES: [[&str; Constants::NFREQ]; 7] = [
    ["L1", "L2", "L5", "", "", "", ""],                  /* GPS */
    ["G1", "G2", "G3", "G1a", "G2a", "", ""],            /* GLO */
    ["E1", "E5b", "E5a", "E6", "E5ab", "", ""],          /* GAL */
    ["L1", "L2", "L5", "L6", "", "", ""],                /* QZS */
    ["L1", "L5", "", "", "", "", ""],                    /* SBS */
    ["B1I", "B3I", "B2a", "B1C", "B2ab", "B2I", "B2b"],  /* BDS */
    ["L5", "S", "", "", "", "", ""],                     /* IRN */
];

/// Glonass frequency channel numbers by slot, used in the
/// absence of broadcast ephemeris.
const GLO_FCN: [i8; 32] = [
    1, -4, 5, 6, 1, -4, 5, 6, /* R01-R08 */
    2, -7, 0, -1, -2, -7, 0, -1, /* R09-R16 */
    4, -3, 3, 2, 4, -3, 3, 2, /* R17-R24 */
    -5, 1, 1, 1, 1, 1, 1, 1, /* not R26, R27 */
];

fn msm_signals(c: Constellation) -> &'static [&'static str; 32] {
    match c {
        Constellation::GPS => &MSM_SIG_GPS,
        Constellation::Glonass => &MSM_SIG_GLO,
        Constellation::Galileo => &MSM_SIG_GAL,
        Constellation::QZSS => &MSM_SIG_QZS,
        Constellation::SBAS => &MSM_SIG_SBS,
        Constellation::BeiDou => &MSM_SIG_CMP,
        Constellation::IRNSS => &MSM_SIG_IRN,
    }
}

/// Resolves a 1..=32 MSM signal id into an [ObsCode],
/// [ObsCode::Unknown] for reserved slots.
pub(crate) fn msm_signal(c: Constellation, sig_id: u8) -> ObsCode {
    if sig_id == 0 || sig_id > 32 {
        return ObsCode::Unknown;
    }
    ObsCode::from(msm_signals(c)[sig_id as usize - 1])
}

/// Resolves an [ObsCode] back into its 1..=32 MSM signal id,
/// 0 when the code has no MSM slot. GPS codes with no RTCM
/// identity collapse onto the P(Y) slots first.
pub(crate) fn msm_signal_id(c: Constellation, code: ObsCode) -> u8 {
    let code = match (c, code) {
        (Constellation::GPS, ObsCode::L1Y | ObsCode::L1M | ObsCode::L1N) => ObsCode::L1P,
        (Constellation::GPS, ObsCode::L2D | ObsCode::L2Y | ObsCode::L2M | ObsCode::L2N) => {
            ObsCode::L2P
        },
        _ => code,
    };
    let s = code.as_str();
    if s.is_empty() {
        return 0;
    }
    for (i, sig) in msm_signals(c).iter().enumerate() {
        if *sig == s {
            return i as u8 + 1;
        }
    }
    0
}

/// Glonass channel number of a slot, None when unknown.
pub(crate) fn glo_fcn(prn: u16) -> Option<i8> {
    if prn == 0 || prn as usize > GLO_FCN.len() {
        return None;
    }
    let fcn = GLO_FCN[prn as usize - 1];
    if fcn > -8 {
        Some(fcn)
    } else {
        None
    }
}

/// 0-based logical band of an [ObsCode] within its constellation's
/// canonical band list, None when the code does not designate
/// a band of this constellation.
pub(crate) fn band_ordinal(c: Constellation, code: ObsCode) -> Option<usize> {
    match c {
        Constellation::GPS => match code.band_char() {
            '1' => Some(0), /* L1 */
            '2' => Some(1), /* L2 */
            '5' => Some(2), /* L5 */
            _ => None,
        },
        Constellation::Glonass => match code.band_char() {
            '1' => Some(0), /* G1 */
            '2' => Some(1), /* G2 */
            '3' => Some(2), /* G3 */
            '4' => Some(3), /* G1a */
            '6' => Some(4), /* G2a */
            _ => None,
        },
        Constellation::Galileo => match code.band_char() {
            '1' => Some(0), /* E1 */
            '7' => Some(1), /* E5b */
            '5' => Some(2), /* E5a */
            '6' => Some(3), /* E6 */
            '8' => Some(4), /* E5ab */
            _ => None,
        },
        Constellation::QZSS => match code.band_char() {
            '1' => Some(0), /* L1 */
            '2' => Some(1), /* L2 */
            '5' => Some(2), /* L5 */
            '6' => Some(3), /* L6 */
            _ => None,
        },
        Constellation::SBAS => match code.band_char() {
            '1' => Some(0), /* L1 */
            '5' => Some(1), /* L5 */
            _ => None,
        },
        Constellation::BeiDou => match code.band_char() {
            '2' => Some(0), /* B1I */
            '6' => Some(1), /* B3 */
            '5' => Some(2), /* B2a */
            '1' => Some(3), /* B1C */
            '8' => Some(4), /* B2ab */
            '7' => match code.attr_char() {
                'I' | 'Q' | 'X' => Some(5), /* B2I */
                _ => Some(6),               /* B2b */
            },
            _ => None,
        },
        Constellation::IRNSS => match code.band_char() {
            '5' => Some(0), /* L5 */
            '9' => Some(1), /* S */
            _ => None,
        },
    }
}

/// Carrier frequency (Hz) of an [ObsCode], 0.0 when unknown.
/// Glonass G1/G2 are channel dependent: without a valid FCN
/// no Glonass frequency is resolved.
pub(crate) fn carrier_frequency(c: Constellation, code: ObsCode, fcn: Option<i8>) -> f64 {
    if c == Constellation::Glonass {
        let fcn = match fcn {
            Some(fcn) if (-7..=6).contains(&fcn) => fcn as f64,
            _ => return 0.0,
        };
        return match code.band_char() {
            '1' => Constants::FREQ1_GLO + Constants::DFRQ1_GLO * fcn,
            '2' => Constants::FREQ2_GLO + Constants::DFRQ2_GLO * fcn,
            '3' => Constants::FREQ3_GLO,
            '4' => Constants::FREQ1A_GLO,
            '6' => Constants::FREQ2A_GLO,
            _ => 0.0,
        };
    }
    match (c, code.band_char()) {
        (Constellation::GPS, '1') => Constants::FREQ1,
        (Constellation::GPS, '2') => Constants::FREQ2,
        (Constellation::GPS, '5') => Constants::FREQ5,
        (Constellation::Galileo, '1') => Constants::FREQ1,
        (Constellation::Galileo, '7') => Constants::FREQ7,
        (Constellation::Galileo, '5') => Constants::FREQ5,
        (Constellation::Galileo, '6') => Constants::FREQ6,
        (Constellation::Galileo, '8') => Constants::FREQ8,
        (Constellation::QZSS, '1') => Constants::FREQ1,
        (Constellation::QZSS, '2') => Constants::FREQ2,
        (Constellation::QZSS, '5') => Constants::FREQ5,
        (Constellation::QZSS, '6') => Constants::FREQ6,
        (Constellation::SBAS, '1') => Constants::FREQ1,
        (Constellation::SBAS, '5') => Constants::FREQ5,
        (Constellation::BeiDou, '2') => Constants::FREQ1_CMP,
        (Constellation::BeiDou, '6') => Constants::FREQ3_CMP,
        (Constellation::BeiDou, '5') => Constants::FREQ5,
        (Constellation::BeiDou, '1') => Constants::FREQ1,
        (Constellation::BeiDou, '8') => Constants::FREQ8,
        (Constellation::BeiDou, '7') => Constants::FREQ2_CMP, /* B2I and B2b */
        (Constellation::IRNSS, '5') => Constants::FREQ5,
        (Constellation::IRNSS, '9') => Constants::FREQ9,
        _ => 0.0,
    }
}

/// Priority of an [ObsCode] among the codes of its band:
/// 14 highest, 1 lowest, 0 unranked.
pub(crate) fn code_priority(c: Constellation, code: ObsCode) -> u8 {
    let ord = match band_ordinal(c, code) {
        Some(ord) => ord,
        None => return 0,
    };
    let attr = code.attr_char();
    match CODE_PRIORITIES[c.index()][ord].chars().position(|p| p == attr) {
        Some(pos) => 14 - pos as u8,
        None => 0,
    }
}

/// 0-based logical band designated by a canonical band name
/// ("L1", "E5b", "B2I", ..), None when the name is not one of
/// this constellation's bands.
pub(crate) fn band_name_ordinal(c: Constellation, name: &str) -> Option<usize> {
    BAND_NAMES[c.index()]
        .iter()
        .position(|b| !b.is_empty() && *b == name)
}
