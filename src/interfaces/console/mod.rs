pub mod otp_prompt;
pub mod report;
