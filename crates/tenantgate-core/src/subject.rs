//! Subject parsing: map a credential subject onto the tenant it acts for.
//!
//! Subjects are minted as `<tenant>[-client]-<suffix>` where `<suffix>` is a
//! generated instance id. A `-client` marker denotes a delegated identity one
//! level below its owning tenant. Administrative accounts carry no hyphen at
//! all and are returned unchanged.
//!
//! Exactly one trailing suffix segment and at most one `-client` marker are
//! stripped. Both returned identities borrow from the subject, so parsing
//! never allocates.

/// Trailing segment marking a delegated (service) identity.
pub const CLIENT_MARKER: &str = "-client";

/// Split a subject into `(immediate, root)` tenant identities.
///
/// `immediate` is the subject without its trailing suffix segment; `root` is
/// `immediate` with one trailing `-client` marker removed, if present.
///
/// The marker includes its leading hyphen, so a subject whose immediate
/// identity is the bare word `client` keeps it as root: `client-x1` yields
/// (`client`, `client`), never an empty root. Stripping `client` without the
/// hyphen would leave `""`, which [`verify_subject`] rejects anyway.
///
/// ```
/// use tenantgate_core::subject::extract_tenant;
///
/// assert_eq!(extract_tenant("adminuser"), ("adminuser", "adminuser"));
/// assert_eq!(extract_tenant("acme-io-9f2k"), ("acme-io", "acme-io"));
/// assert_eq!(extract_tenant("acme-io-client-9f2k"), ("acme-io-client", "acme-io"));
/// assert_eq!(extract_tenant("client-x1"), ("client", "client"));
/// ```
pub fn extract_tenant(subject: &str) -> (&str, &str) {
    // no hyphen: admin/system account
    let Some((immediate, _suffix)) = subject.rsplit_once('-') else {
        return (subject, subject);
    };
    let root = immediate.strip_suffix(CLIENT_MARKER).unwrap_or(immediate);
    (immediate, root)
}

/// Whether `subject` authenticates as `tenant`.
///
/// True iff `tenant` equals the immediate or the root identity of the subject.
/// An empty tenant never matches.
pub fn verify_subject(tenant: &str, subject: &str) -> bool {
    if tenant.is_empty() {
        return false;
    }
    let (immediate, root) = extract_tenant(subject);
    tenant == immediate || tenant == root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_account_is_untouched() {
        assert_eq!(extract_tenant("superuser"), ("superuser", "superuser"));
        assert_eq!(extract_tenant(""), ("", ""));
    }

    #[test]
    fn strips_single_suffix() {
        assert_eq!(extract_tenant("acme-x1"), ("acme", "acme"));
        assert_eq!(extract_tenant("acme-corp-eu-x1"), ("acme-corp-eu", "acme-corp-eu"));
    }

    #[test]
    fn strips_one_client_marker_only() {
        assert_eq!(extract_tenant("acme-client-x1"), ("acme-client", "acme"));
        assert_eq!(
            extract_tenant("acme-client-client-x1"),
            ("acme-client-client", "acme-client")
        );
    }

    #[test]
    fn bare_client_token_keeps_root() {
        // no hyphen precedes the marker, so there is nothing to strip
        assert_eq!(extract_tenant("client-x1"), ("client", "client"));
    }

    #[test]
    fn lookalike_marker_is_kept() {
        assert_eq!(extract_tenant("acme-clien-x1"), ("acme-clien", "acme-clien"));
        assert_eq!(extract_tenant("acme-clients-x1"), ("acme-clients", "acme-clients"));
        assert_eq!(extract_tenant("acme-myclient-x1"), ("acme-myclient", "acme-myclient"));
    }

    #[test]
    fn empty_tenant_never_verifies() {
        assert!(!verify_subject("", "-x1"));
        assert!(!verify_subject("", ""));
    }
}
