use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

/// The name of the one-shot message cookie.
pub const FLASH_COOKIE: &str = "flash";

/// How long an unread flash message survives.
const FLASH_MAX_AGE_SECS: i64 = 60;

/// One-shot messages shown on the next rendered page.
///
/// The cookie only carries the code; the text never round-trips through
/// the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    LoginRequired,
    AccessDenied,
    LoggedOut,
    AccountDeleted,
    NoteDeleted,
}

impl Flash {
    pub fn code(self) -> &'static str {
        match self {
            Flash::LoginRequired => "login_required",
            Flash::AccessDenied => "access_denied",
            Flash::LoggedOut => "logged_out",
            Flash::AccountDeleted => "account_deleted",
            Flash::NoteDeleted => "note_deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "login_required" => Some(Flash::LoginRequired),
            "access_denied" => Some(Flash::AccessDenied),
            "logged_out" => Some(Flash::LoggedOut),
            "account_deleted" => Some(Flash::AccountDeleted),
            "note_deleted" => Some(Flash::NoteDeleted),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::LoginRequired => "You must be logged in.",
            Flash::AccessDenied => "Cannot access this user.",
            Flash::LoggedOut => "You have been logged out.",
            Flash::AccountDeleted => "Account deleted.",
            Flash::NoteDeleted => "Note deleted.",
        }
    }
}

fn flash_cookie(flash: Flash) -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, flash.code());
    cookie.set_http_only(true);
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(FLASH_MAX_AGE_SECS));
    cookie.set_path("/");
    cookie
}

/// Queues `flash` for the next page.
pub fn set(cookies: &Cookies, flash: Flash) {
    cookies.add(flash_cookie(flash));
}

/// `Set-Cookie` value for responses built without the cookie jar.
pub fn set_cookie_header(flash: Flash) -> String {
    flash_cookie(flash).to_string()
}

/// Reads and clears the pending flash message.
pub fn take(cookies: &Cookies) -> Option<Flash> {
    let cookie = cookies.get(FLASH_COOKIE)?;
    let flash = Flash::from_code(cookie.value());

    let mut expired = Cookie::new(FLASH_COOKIE, "");
    expired.set_path("/");
    cookies.remove(expired);

    flash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for flash in [Flash::LoginRequired, Flash::AccessDenied, Flash::LoggedOut, Flash::AccountDeleted, Flash::NoteDeleted] {
            assert_eq!(Flash::from_code(flash.code()), Some(flash));
        }
        assert_eq!(Flash::from_code("<script>"), None);
    }

    #[test]
    fn header_is_scoped_to_root_and_short_lived() {
        let header = set_cookie_header(Flash::LoginRequired);
        assert!(header.starts_with("flash=login_required"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Max-Age=60"));
    }
}
