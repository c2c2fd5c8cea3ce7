mod credentials;
mod profile;
mod session;
mod sign_up;
