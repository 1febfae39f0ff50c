pub mod ban_user;
pub mod get_user;
pub mod list_sessions;
pub mod list_users;
pub mod revoke_session;
pub mod revoke_sessions;
pub mod unban_user;
pub mod update_role;
pub mod update_user;
