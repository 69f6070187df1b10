// Providers layer - Work performers
//
// Providers perform the actual work (hashing, signing, validation rules)
// that services and coordinators orchestrate.

pub mod crypto_provider;
pub mod email_validator_provider;
pub mod password_validator_provider;
pub mod token_provider;

// Re-export providers for clean imports
pub use crypto_provider::CryptoProvider;
pub use email_validator_provider::{
    DnsHostResolver, EmailValidationError, EmailValidatorProvider, HostResolver,
    StaticHostResolver,
};
pub use password_validator_provider::{
    CharsetEntropyEstimator, EntropyEstimator, PasswordValidationError,
    PasswordValidatorProvider,
};
pub use token_provider::{TokenProvider, TokenVerificationError};
