pub mod me;
pub mod session;
pub mod signin;
pub mod signup;
pub mod token_info;
