//! K-line alert webhook signing, verification and payload parsing

pub mod alerts;
pub mod verify;

pub use alerts::{AlertPayload, AlertTimestamp};
pub use verify::{
    compute_signature, verify_signature, Secret, SignatureVerifier, VerificationResult,
    SIGNATURE_HEADER, SIGNATURE_PREFIX,
};
