//! Route access decisions
//!
//! Keeps the "may this session see that screen" logic in one place. The
//! server still enforces every rule; this only drives navigation.

use super::state_types::Session;

/// What a route demands of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    None,
    AnyAuthenticated,
    AdminOnly,
}

/// Where a denied visitor should be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectTarget {
    Login,
    Profile,
}

impl RedirectTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectTarget::Login => "login",
            RedirectTarget::Profile => "profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Allow,
    Deny { redirect: RedirectTarget },
    /// Session not resolved yet; render nothing and wait
    Pending,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    pub fn redirect(&self) -> Option<RedirectTarget> {
        match self {
            Verdict::Deny { redirect } => Some(*redirect),
            _ => None,
        }
    }
}

/// Decide whether `session` satisfies `requirement`
pub fn decide(session: &Session, requirement: Requirement) -> Verdict {
    AccessPolicy::new(session).decide(requirement)
}

/// Access checks against one session snapshot
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy<'a> {
    session: &'a Session,
}

impl<'a> AccessPolicy<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Check if the user has admin role
    pub fn is_admin(&self) -> bool {
        self.session
            .user()
            .map(|user| user.role.can_access_admin())
            .unwrap_or(false)
    }

    pub fn can_manage_users(&self) -> bool {
        self.is_admin()
    }

    pub fn decide(&self, requirement: Requirement) -> Verdict {
        if requirement == Requirement::None {
            return Verdict::Allow;
        }

        if self.session.is_loading() {
            return Verdict::Pending;
        }

        if !self.is_authenticated() {
            return Verdict::Deny {
                redirect: RedirectTarget::Login,
            };
        }

        match requirement {
            Requirement::AdminOnly if !self.is_admin() => Verdict::Deny {
                redirect: RedirectTarget::Profile,
            },
            _ => Verdict::Allow,
        }
    }
}
