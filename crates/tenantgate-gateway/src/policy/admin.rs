//! Admin API gate: superusers may mutate, everyone else may only read.

use std::collections::HashSet;

use axum::http::{Method, Request};

/// Subjects with unrestricted admin access.
#[derive(Debug, Clone, Default)]
pub struct SuperRoles(HashSet<String>);

impl SuperRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, subject: &str) -> bool {
        self.0.contains(subject)
    }
}

/// Evaluates namespace/topic admin API calls.
///
/// No per-tenant override exists here: a call is allowed iff the subject is a
/// superuser or the request is a `GET`.
#[derive(Debug, Clone, Default)]
pub struct AdminApiEvaluator {
    super_roles: SuperRoles,
}

impl AdminApiEvaluator {
    pub fn new(super_roles: SuperRoles) -> Self {
        Self { super_roles }
    }

    pub fn is_super_role(&self, subject: &str) -> bool {
        self.super_roles.contains(subject)
    }

    pub fn eval_namespace_admin_api<B>(&self, req: &Request<B>, subject: &str) -> bool {
        self.eval(req.method(), subject, "namespace")
    }

    pub fn eval_topic_admin_api<B>(&self, req: &Request<B>, subject: &str) -> bool {
        self.eval(req.method(), subject, "topic")
    }

    fn eval(&self, method: &Method, subject: &str, api: &'static str) -> bool {
        if self.is_super_role(subject) || method == Method::GET {
            return true;
        }
        tracing::debug!(%subject, %method, api, "admin api mutation denied");
        false
    }
}
