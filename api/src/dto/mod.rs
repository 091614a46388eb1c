pub mod verify;

pub use verify::{RedeemResponse, SignupRequest, SignupResponse, VerifyCodeRequest};
