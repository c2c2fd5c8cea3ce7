//! Demo account: a fixed member that can sign in without a backend.

use chrono::Utc;
use ld_core::{Credentials, Identity, Profile, Session};

pub const DEMO_EMAIL: &str = "demo@demo.com";
pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_USER_ID: &str = "demo-user-id";
const DEMO_ACCESS_TOKEN: &str = "demo";
const DEMO_FULL_NAME: &str = "Utilisateur Demo";
const DEMO_PHONE: &str = "+225 01 02 03 04";
const DEMO_DISTRICT: &str = "Abidjan";

pub fn is_demo_credentials(credentials: &Credentials) -> bool {
    credentials.email == DEMO_EMAIL && credentials.password == DEMO_PASSWORD
}

pub(crate) fn is_demo_session(session: &Session) -> bool {
    session.access_token == DEMO_ACCESS_TOKEN && session.user.id == DEMO_USER_ID
}

pub(crate) fn demo_identity() -> Identity {
    Identity::new(DEMO_USER_ID, Some(String::from(DEMO_EMAIL)))
}

pub(crate) fn demo_session() -> Session {
    Session::new(DEMO_ACCESS_TOKEN, demo_identity())
}

pub(crate) fn demo_profile() -> Profile {
    Profile {
        id: String::from(DEMO_USER_ID),
        email: Some(String::from(DEMO_EMAIL)),
        full_name: String::from(DEMO_FULL_NAME),
        avatar_url: None,
        phone: Some(String::from(DEMO_PHONE)),
        district: String::from(DEMO_DISTRICT),
        created_at: Utc::now(),
        updated_at: None,
    }
}
