use crate::poses::Modality;
use crate::scene::ObstacleKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The internal failure modes of the simulation engine. Anything beyond these (I/O,
/// serialization) is surfaced as a boxed error by the crate-wide [`crate::Result`]
/// alias. The boundary layer is expected to turn either kind into a structured
/// failure response, so the messages here are written to be shown to a client.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorError {
    /// A lookup referenced a sensor id outside the configured pose table.
    IdOutOfRange {
        modality: Modality,
        id: usize,
        count: usize,
    },
    /// An obstacle template cannot produce a point cluster (non-positive or
    /// non-finite size, non-finite position).
    DegenerateTemplate {
        kind: ObstacleKind,
        detail: &'static str,
    },
    /// A tracked obstacle record is not a valid simulation state.
    InvalidTrack { id: u32, detail: &'static str },
}

impl Display for SensorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorError::IdOutOfRange {
                modality,
                id,
                count,
            } => {
                write!(
                    f,
                    "{modality} id {id} is out of range for an array of {count} sensors"
                )
            }
            SensorError::DegenerateTemplate { kind, detail } => {
                write!(f, "degenerate {kind} template: {detail}")
            }
            SensorError::InvalidTrack { id, detail } => {
                write!(f, "invalid tracked obstacle {id}: {detail}")
            }
        }
    }
}

impl Error for SensorError {}
