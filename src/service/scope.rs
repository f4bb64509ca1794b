//! Tenant visibility resolution.
//!
//! Every read path that can cross tenant boundaries goes through a
//! [`TenantScope`] resolved here, so the isolation rules live in exactly
//! one place. A missing or half-configured alliance is treated as
//! inactive, never as an error.

use std::collections::HashSet;

use sea_orm::DatabaseConnection;

use crate::{
    data::{
        alliance::AllianceRepository, alliance_activation::AllianceActivationRepository,
        alliance_member::AllianceMemberRepository,
    },
    error::Error,
    model::domain::MemberStatus,
};

/// The set of tenants and event codes a caller may see.
#[derive(Clone, Debug)]
pub struct TenantScope {
    pub team_number: i32,
    /// Tenant numbers whose rows are visible, always including the caller.
    pub visible_numbers: HashSet<i32>,
    /// Event codes the alliance shares; empty for solo scope.
    pub shared_event_codes: HashSet<String>,
    /// Active alliance (id, name) when sharing is in effect.
    pub alliance: Option<(i32, String)>,
    /// Also match legacy rows with no owner. Only meaningful for solo
    /// scope; single-tenant installs predate owner stamping.
    pub include_legacy: bool,
}

impl TenantScope {
    /// Scope of a tenant with no active alliance: itself, nothing shared.
    pub fn solo(team_number: i32) -> Self {
        Self {
            team_number,
            visible_numbers: HashSet::from([team_number]),
            shared_event_codes: HashSet::new(),
            alliance: None,
            include_legacy: false,
        }
    }

    pub fn with_legacy(mut self) -> Self {
        self.include_legacy = true;
        self
    }
}

pub struct ScopeResolver<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolve the caller's visibility. Alliance scope requires, all at
    /// once: an activation pointing at an alliance that exists, the caller
    /// on its roster as an accepted member, and at least one shared event
    /// code. Anything less degrades to solo scope.
    pub async fn resolve(&self, team_number: i32) -> Result<TenantScope, Error> {
        let activation_repo = AllianceActivationRepository::new(self.db);
        let alliance_repo = AllianceRepository::new(self.db);
        let member_repo = AllianceMemberRepository::new(self.db);

        let Some(activation) = activation_repo.get_for_team(team_number).await? else {
            return Ok(TenantScope::solo(team_number));
        };
        let Some(alliance_id) = activation.alliance_id else {
            return Ok(TenantScope::solo(team_number));
        };
        let Some(alliance) = alliance_repo.get_by_id(alliance_id).await? else {
            return Ok(TenantScope::solo(team_number));
        };

        let caller = member_repo.get(alliance.id, team_number).await?;
        let caller_accepted = caller
            .map(|member| member.status == MemberStatus::Accepted.as_str())
            .unwrap_or(false);
        if !caller_accepted {
            return Ok(TenantScope::solo(team_number));
        }

        let shared_event_codes: HashSet<String> = alliance_repo
            .get_shared_event_codes(alliance.id)
            .await?
            .into_iter()
            .collect();
        if shared_event_codes.is_empty() {
            return Ok(TenantScope::solo(team_number));
        }

        let mut visible_numbers: HashSet<i32> = member_repo
            .get_accepted(alliance.id)
            .await?
            .into_iter()
            .map(|member| member.team_number)
            .collect();
        visible_numbers.insert(team_number);

        Ok(TenantScope {
            team_number,
            visible_numbers,
            shared_event_codes,
            alliance: Some((alliance.id, alliance.name)),
            include_legacy: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use crate::{
        data::alliance::AllianceRepository,
        service::scope::ScopeResolver,
        util::test::setup::{test_setup, test_setup_create_alliance},
    };

    /// A tenant with no activation row resolves to itself only
    #[tokio::test]
    async fn unconfigured_tenant_is_solo() -> Result<(), DbErr> {
        let test = test_setup().await;
        let resolver = ScopeResolver::new(&test.state.db);

        let scope = resolver.resolve(1111).await.unwrap();

        assert!(scope.alliance.is_none());
        assert_eq!(scope.visible_numbers.len(), 1);
        assert!(scope.visible_numbers.contains(&1111));
        assert!(scope.shared_event_codes.is_empty());

        Ok(())
    }

    /// A fully configured alliance widens visibility to every accepted
    /// member and carries the shared code list
    #[tokio::test]
    async fn configured_alliance_widens_scope() -> Result<(), DbErr> {
        let test = test_setup().await;
        let resolver = ScopeResolver::new(&test.state.db);
        let alliance_repo = AllianceRepository::new(&test.state.db);

        let alliance = test_setup_create_alliance(&test, "TestAlliance", &[1111, 2222, 3333])
            .await
            .unwrap();
        alliance_repo
            .set_shared_event_codes(alliance.id, &["EVTX".to_string()])
            .await?;

        let scope = resolver.resolve(2222).await.unwrap();

        assert_eq!(scope.alliance, Some((alliance.id, "TestAlliance".to_string())));
        assert_eq!(scope.visible_numbers.len(), 3);
        assert!(scope.shared_event_codes.contains("EVTX"));

        Ok(())
    }

    /// An activated alliance with no shared codes stays solo
    #[tokio::test]
    async fn alliance_without_shared_codes_is_solo() -> Result<(), DbErr> {
        let test = test_setup().await;
        let resolver = ScopeResolver::new(&test.state.db);

        test_setup_create_alliance(&test, "TestAlliance", &[1111, 2222])
            .await
            .unwrap();

        let scope = resolver.resolve(1111).await.unwrap();

        assert!(scope.alliance.is_none());
        assert_eq!(scope.visible_numbers.len(), 1);

        Ok(())
    }
}
