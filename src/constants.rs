pub(crate) struct Constants {}

impl Constants {
    /// RTCM3 frame preamble
    pub const PREAMBLE: u8 = 0xD3;

    /// Speed of light (m/s)
    pub const C_LIGHT: f64 = 299_792_458.0;

    /// Range covered in 1 ms (m)
    pub const RANGE_MS: f64 = Self::C_LIGHT * 0.001;

    /// 2^-10: rough range modulo scaling (ms)
    pub const P2_10: f64 = 0.0009765625;

    /// 2^-24: fine pseudorange scaling (ms)
    pub const P2_24: f64 = 5.960464477539063E-8;

    /// 2^-29: fine phase-range scaling (ms)
    pub const P2_29: f64 = 1.862645149230957E-9;

    /// SNR storage unit (dBHz)
    pub const SNR_UNIT: f64 = 0.001;

    /// Primary frequency slots per observation record
    pub const NFREQ: usize = 7;

    /// Extended observation slots per observation record
    pub const NEXOBS: usize = 3;

    /// Total slots per observation record
    pub const NSLOTS: usize = Self::NFREQ + Self::NEXOBS;

    /// Observation records per message
    pub const MAX_OBS: usize = 96;

    /// RTCM3 payload limit (bytes)
    pub const MAX_PAYLOAD_LEN: usize = 1024;

    /// L1/E1/B1C frequency (Hz)
    pub const FREQ1: f64 = 1.57542E9;

    /// L2 frequency (Hz)
    pub const FREQ2: f64 = 1.22760E9;

    /// L5/E5a/B2a frequency (Hz)
    pub const FREQ5: f64 = 1.17645E9;

    /// E6/L6 frequency (Hz)
    pub const FREQ6: f64 = 1.27875E9;

    /// E5b frequency (Hz)
    pub const FREQ7: f64 = 1.20714E9;

    /// E5a+b frequency (Hz)
    pub const FREQ8: f64 = 1.191795E9;

    /// IRNSS S frequency (Hz)
    pub const FREQ9: f64 = 2.492028E9;

    /// Glonass G1 base frequency (Hz)
    pub const FREQ1_GLO: f64 = 1.60200E9;

    /// Glonass G1 channel bias (Hz/n)
    pub const DFRQ1_GLO: f64 = 0.56250E6;

    /// Glonass G2 base frequency (Hz)
    pub const FREQ2_GLO: f64 = 1.24600E9;

    /// Glonass G2 channel bias (Hz/n)
    pub const DFRQ2_GLO: f64 = 0.43750E6;

    /// Glonass G3 frequency (Hz)
    pub const FREQ3_GLO: f64 = 1.202025E9;

    /// Glonass G1a frequency (Hz)
    pub const FREQ1A_GLO: f64 = 1.600995E9;

    /// Glonass G2a frequency (Hz)
    pub const FREQ2A_GLO: f64 = 1.248060E9;

    /// BeiDou B1I frequency (Hz)
    pub const FREQ1_CMP: f64 = 1.561098E9;

    /// BeiDou B2I/B2b frequency (Hz)
    pub const FREQ2_CMP: f64 = 1.20714E9;

    /// BeiDou B3 frequency (Hz)
    pub const FREQ3_CMP: f64 = 1.26852E9;
}
