use thiserror::Error;

use crate::error::FlowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignUpError {
    #[error("name is required")]
    MissingName,
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
    #[error("password confirmation is required")]
    MissingConfirmation,
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl From<SignUpError> for FlowError {
    fn from(value: SignUpError) -> Self {
        FlowError::Validation(value.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// Reports the first rule the form violates, in field order.
    pub fn validate(&self) -> Result<(), SignUpError> {
        if self.name.is_empty() {
            return Err(SignUpError::MissingName);
        }
        if self.email.is_empty() {
            return Err(SignUpError::MissingEmail);
        }
        if self.password.is_empty() {
            return Err(SignUpError::MissingPassword);
        }
        if self.confirm_password.is_empty() {
            return Err(SignUpError::MissingConfirmation);
        }
        if self.password != self.confirm_password {
            return Err(SignUpError::PasswordMismatch);
        }
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Same checks as [`SignUpForm::validate`], reported through the client error type.
    pub fn check(&self) -> Result<(), FlowError> {
        self.validate().map_err(FlowError::from)
    }
}
