#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

use log::error;
use thiserror::Error;

mod code;
mod constants;
mod constellation;
mod decoder;
mod encoder;
mod observation;
mod selection;
mod signal;

pub mod bits;
pub mod checksum;

pub use code::ObsCode;
pub use constellation::Constellation;
pub use decoder::{decode, MsmHeader};
pub use observation::{LliFlags, ObsRecord, ObsSet};
pub use selection::FreqSelection;

pub mod prelude {
    pub use crate::{
        convert, decode, Constellation, Error, FreqSelection, LliFlags, MsmHeader, ObsCode,
        ObsRecord, ObsSet,
    };
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("not enough bytes available")]
    NotEnoughBytes,
    #[error("non supported message type {0}")]
    NonSupportedMessage(u16),
    #[error("invalid satellite and signal mask layout")]
    InvalidMaskLayout,
    #[error("message length overflow")]
    MessageLengthOverflow,
}

/// Transcodes one RTCM3 MSM4 frame: decodes `input`, drops every
/// signal whose band is not retained by `selection`, re-encodes
/// the surviving observations into `output` and returns the
/// total frame length written, parity included.
///
/// `input` must hold one complete frame of the MSM4 family with
/// valid framing; any other RTCM3 subtype is rejected. `sync`
/// is the multiple message bit to emit in the output header
/// (1: another message of the same epoch follows). `output`
/// must be large enough for the re-encoded frame: the input
/// frame length always suffices, filtering never grows a
/// message.
///
/// ```
/// use msm4::prelude::{convert, Error, FreqSelection};
///
/// let selection = FreqSelection::from_bands([
///     "L1+L2", "", "", "", "", "", "",
/// ]);
/// let mut output = [0; 1200];
/// // no complete frame: nothing converted
/// assert!(matches!(
///     convert(0, &[0xD3, 0x00], &selection, &mut output),
///     Err(Error::NotEnoughBytes),
/// ));
/// ```
pub fn convert(
    sync: u8,
    input: &[u8],
    selection: &FreqSelection,
    output: &mut [u8],
) -> Result<usize, Error> {
    if input.len() * 8 < 36 {
        return Err(Error::NotEnoughBytes);
    }

    let msg_type = bits::get_unsigned(input, 24, 12) as u16;

    let constellation = match Constellation::from_msm4_type(msg_type) {
        Some(constellation) => constellation,
        None => {
            error!("non supported rtcm3 type: {}", msg_type);
            return Err(Error::NonSupportedMessage(msg_type));
        },
    };

    let (_, obs) = decoder::decode(constellation, input, selection)?;

    encoder::encode(constellation, sync, input, &obs, selection, output)
}
