//! Alliance roster management.
//!
//! Membership and activation are independent: a tenant can sit on a
//! roster without alliance mode being active, and deactivating never
//! touches the roster. Removal and demotion leave previously shared
//! records and outbox entries untouched.

use sea_orm::DatabaseConnection;

use crate::{
    data::{
        alliance::AllianceRepository, alliance_activation::AllianceActivationRepository,
        alliance_member::AllianceMemberRepository, is_unique_violation,
    },
    error::{sync::SyncError, Error},
    model::{
        api::{AllianceStatusDto, MemberDto},
        domain::{MemberRole, MemberStatus},
    },
};

pub struct AllianceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AllianceService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an alliance; the creator joins as an accepted admin.
    pub async fn create_alliance(
        &self,
        creator_number: i32,
        name: &str,
    ) -> Result<entity::alliance::Model, Error> {
        let alliance_repo = AllianceRepository::new(self.db);
        let member_repo = AllianceMemberRepository::new(self.db);

        let alliance = match alliance_repo.create(name).await {
            Ok(alliance) => alliance,
            Err(err) if is_unique_violation(&err) => {
                return Err(SyncError::AllianceNameTaken(name.to_string()).into());
            }
            Err(err) => return Err(err.into()),
        };

        member_repo
            .create(
                alliance.id,
                creator_number,
                MemberRole::Admin,
                MemberStatus::Accepted,
            )
            .await?;

        Ok(alliance)
    }

    /// Invite a tenant to the inviter's active alliance. Re-inviting an
    /// existing member is a no-op returning the current roster row.
    pub async fn invite_member(
        &self,
        inviter_number: i32,
        invitee_number: i32,
    ) -> Result<entity::alliance_member::Model, Error> {
        let member_repo = AllianceMemberRepository::new(self.db);

        let alliance_id = self.require_admin(inviter_number).await?;

        if let Some(existing) = member_repo.get(alliance_id, invitee_number).await? {
            return Ok(existing);
        }

        let member = member_repo
            .create(
                alliance_id,
                invitee_number,
                MemberRole::Member,
                MemberStatus::Pending,
            )
            .await?;

        Ok(member)
    }

    /// Accept or decline a pending invite. Declining removes the roster
    /// row entirely.
    pub async fn respond_to_invite(
        &self,
        team_number: i32,
        alliance_id: i32,
        accept: bool,
    ) -> Result<Option<entity::alliance_member::Model>, Error> {
        let member_repo = AllianceMemberRepository::new(self.db);

        let member = member_repo
            .get(alliance_id, team_number)
            .await?
            .filter(|member| member.status == MemberStatus::Pending.as_str())
            .ok_or(SyncError::InviteNotFound(team_number))?;

        if accept {
            let accepted = member_repo.set_status(member, MemberStatus::Accepted).await?;
            return Ok(Some(accepted));
        }

        member_repo.remove(member).await?;
        Ok(None)
    }

    /// Point the tenant's activation at an alliance it has accepted
    /// membership in.
    pub async fn activate(&self, team_number: i32, alliance_id: i32) -> Result<(), Error> {
        let alliance_repo = AllianceRepository::new(self.db);
        let member_repo = AllianceMemberRepository::new(self.db);
        let activation_repo = AllianceActivationRepository::new(self.db);

        let alliance = alliance_repo
            .get_by_id(alliance_id)
            .await?
            .ok_or_else(|| SyncError::AllianceNotFound(alliance_id.to_string()))?;

        let accepted = member_repo
            .get(alliance.id, team_number)
            .await?
            .map(|member| member.status == MemberStatus::Accepted.as_str())
            .unwrap_or(false);
        if !accepted {
            return Err(SyncError::NotAMember {
                alliance_id: alliance.id,
                team_number,
            }
            .into());
        }

        activation_repo
            .set_active(team_number, Some(alliance.id))
            .await?;

        Ok(())
    }

    /// Turn alliance mode off for the tenant. Roster membership persists.
    pub async fn deactivate(&self, team_number: i32) -> Result<(), Error> {
        let activation_repo = AllianceActivationRepository::new(self.db);

        activation_repo.set_active(team_number, None).await?;

        Ok(())
    }

    pub async fn get_shared_event_codes(&self, team_number: i32) -> Result<Vec<String>, Error> {
        let alliance_repo = AllianceRepository::new(self.db);

        let alliance_id = self.require_active_alliance(team_number).await?;

        Ok(alliance_repo.get_shared_event_codes(alliance_id).await?)
    }

    /// Replace the shared event code list; admin only. Codes are
    /// normalized the same way event codes are on the write path.
    pub async fn set_shared_event_codes(
        &self,
        team_number: i32,
        event_codes: &[String],
    ) -> Result<Vec<String>, Error> {
        let alliance_repo = AllianceRepository::new(self.db);

        let alliance_id = self.require_admin(team_number).await?;

        let mut normalized: Vec<String> = event_codes
            .iter()
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();

        alliance_repo
            .set_shared_event_codes(alliance_id, &normalized)
            .await?;

        Ok(normalized)
    }

    /// True when the tenant is an accepted admin of its currently active
    /// alliance. Roster admin of an inactive alliance does not count.
    pub async fn is_alliance_admin(&self, team_number: i32) -> Result<bool, Error> {
        Ok(self.active_admin_alliance(team_number).await?.is_some())
    }

    /// Opt the tenant in or out of contributing data to the active
    /// alliance. Visibility of others' data is unaffected.
    pub async fn set_share_data(
        &self,
        team_number: i32,
        share_data: bool,
    ) -> Result<entity::alliance_member::Model, Error> {
        let member_repo = AllianceMemberRepository::new(self.db);

        let alliance_id = self.require_active_alliance(team_number).await?;

        let member = member_repo
            .get(alliance_id, team_number)
            .await?
            .ok_or(SyncError::NotAMember {
                alliance_id,
                team_number,
            })?;

        Ok(member_repo.set_share_data(member, share_data).await?)
    }

    /// Remove a tenant from the admin's active alliance roster. Shared
    /// history and in-flight outbox entries are left as they are.
    pub async fn remove_member(
        &self,
        admin_number: i32,
        target_number: i32,
    ) -> Result<(), Error> {
        let member_repo = AllianceMemberRepository::new(self.db);
        let activation_repo = AllianceActivationRepository::new(self.db);

        let alliance_id = self.require_admin(admin_number).await?;

        let member = member_repo
            .get(alliance_id, target_number)
            .await?
            .ok_or(SyncError::NotAMember {
                alliance_id,
                team_number: target_number,
            })?;

        member_repo.remove(member).await?;

        // Clear a dangling activation so the removed tenant degrades to
        // solo scope instead of pointing at a roster it left.
        if let Some(activation) = activation_repo.get_for_team(target_number).await? {
            if activation.alliance_id == Some(alliance_id) {
                activation_repo.set_active(target_number, None).await?;
            }
        }

        Ok(())
    }

    /// Full roster view for the caller, including pending invites.
    pub async fn status(&self, team_number: i32) -> Result<AllianceStatusDto, Error> {
        let alliance_repo = AllianceRepository::new(self.db);
        let member_repo = AllianceMemberRepository::new(self.db);
        let activation_repo = AllianceActivationRepository::new(self.db);

        let alliance_id = match activation_repo.get_for_team(team_number).await? {
            Some(activation) => activation.alliance_id,
            None => None,
        };
        let alliance = match alliance_id {
            Some(id) => alliance_repo.get_by_id(id).await?,
            None => None,
        };

        let Some(alliance) = alliance else {
            return Ok(AllianceStatusDto {
                alliance_id: None,
                alliance_name: None,
                active: false,
                is_admin: false,
                members: Vec::new(),
                shared_event_codes: Vec::new(),
            });
        };

        let members = member_repo.get_all(alliance.id).await?;
        let is_admin = members.iter().any(|member| {
            member.team_number == team_number
                && member.role == MemberRole::Admin.as_str()
                && member.status == MemberStatus::Accepted.as_str()
        });

        let member_dtos = members
            .into_iter()
            .map(|member| MemberDto {
                team_number: member.team_number,
                role: if member.role == MemberRole::Admin.as_str() {
                    MemberRole::Admin
                } else {
                    MemberRole::Member
                },
                status: if member.status == MemberStatus::Accepted.as_str() {
                    MemberStatus::Accepted
                } else {
                    MemberStatus::Pending
                },
                share_data: member.share_data,
            })
            .collect();

        Ok(AllianceStatusDto {
            alliance_id: Some(alliance.id),
            alliance_name: Some(alliance.name),
            active: true,
            is_admin,
            members: member_dtos,
            shared_event_codes: alliance_repo.get_shared_event_codes(alliance.id).await?,
        })
    }

    /// Active alliance id the tenant has accepted membership in.
    async fn require_active_alliance(&self, team_number: i32) -> Result<i32, Error> {
        let activation_repo = AllianceActivationRepository::new(self.db);
        let member_repo = AllianceMemberRepository::new(self.db);

        let alliance_id = activation_repo
            .get_for_team(team_number)
            .await?
            .and_then(|activation| activation.alliance_id)
            .ok_or(SyncError::AllianceInactive(team_number))?;

        let accepted = member_repo
            .get(alliance_id, team_number)
            .await?
            .map(|member| member.status == MemberStatus::Accepted.as_str())
            .unwrap_or(false);
        if !accepted {
            return Err(SyncError::NotAMember {
                alliance_id,
                team_number,
            }
            .into());
        }

        Ok(alliance_id)
    }

    async fn require_admin(&self, team_number: i32) -> Result<i32, Error> {
        self.active_admin_alliance(team_number)
            .await?
            .ok_or_else(|| SyncError::NotAnAdmin(team_number).into())
    }

    async fn active_admin_alliance(&self, team_number: i32) -> Result<Option<i32>, Error> {
        let activation_repo = AllianceActivationRepository::new(self.db);
        let member_repo = AllianceMemberRepository::new(self.db);

        let Some(alliance_id) = activation_repo
            .get_for_team(team_number)
            .await?
            .and_then(|activation| activation.alliance_id)
        else {
            return Ok(None);
        };

        let is_admin = member_repo
            .get(alliance_id, team_number)
            .await?
            .map(|member| {
                member.role == MemberRole::Admin.as_str()
                    && member.status == MemberStatus::Accepted.as_str()
            })
            .unwrap_or(false);

        Ok(is_admin.then_some(alliance_id))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use crate::{
        error::{sync::SyncError, Error},
        service::{alliance::AllianceService, scope::ScopeResolver},
        util::test::setup::{test_setup, test_setup_create_alliance},
    };

    /// Creator ends up an accepted admin of the new alliance
    #[tokio::test]
    async fn create_alliance_makes_creator_admin() -> Result<(), DbErr> {
        let test = test_setup().await;
        let alliance_service = AllianceService::new(&test.state.db);

        let alliance = alliance_service
            .create_alliance(1111, "TestAlliance")
            .await
            .unwrap();

        alliance_service.activate(1111, alliance.id).await.unwrap();
        assert!(alliance_service.is_alliance_admin(1111).await.unwrap());

        Ok(())
    }

    /// Duplicate alliance names are rejected with a domain error
    #[tokio::test]
    async fn duplicate_alliance_name_is_rejected() -> Result<(), DbErr> {
        let test = test_setup().await;
        let alliance_service = AllianceService::new(&test.state.db);

        alliance_service
            .create_alliance(1111, "TestAlliance")
            .await
            .unwrap();
        let result = alliance_service.create_alliance(2222, "TestAlliance").await;

        assert!(matches!(
            result,
            Err(Error::SyncError(SyncError::AllianceNameTaken(_)))
        ));

        Ok(())
    }

    /// Invite, accept, activate: the invitee becomes visible in scope
    #[tokio::test]
    async fn invite_accept_activate_flow() -> Result<(), DbErr> {
        let test = test_setup().await;
        let alliance_service = AllianceService::new(&test.state.db);

        let alliance = alliance_service
            .create_alliance(1111, "TestAlliance")
            .await
            .unwrap();
        alliance_service.activate(1111, alliance.id).await.unwrap();

        alliance_service.invite_member(1111, 2222).await.unwrap();

        // Activation before acceptance is refused
        let premature = alliance_service.activate(2222, alliance.id).await;
        assert!(matches!(
            premature,
            Err(Error::SyncError(SyncError::NotAMember { .. }))
        ));

        alliance_service
            .respond_to_invite(2222, alliance.id, true)
            .await
            .unwrap();
        alliance_service.activate(2222, alliance.id).await.unwrap();

        alliance_service
            .set_shared_event_codes(1111, &["evtx ".to_string()])
            .await
            .unwrap();

        let scope = ScopeResolver::new(&test.state.db).resolve(2222).await.unwrap();
        assert!(scope.visible_numbers.contains(&1111));
        assert!(scope.shared_event_codes.contains("EVTX"));

        Ok(())
    }

    /// Declining an invite removes the roster row
    #[tokio::test]
    async fn decline_removes_pending_member() -> Result<(), DbErr> {
        let test = test_setup().await;
        let alliance_service = AllianceService::new(&test.state.db);

        let alliance = alliance_service
            .create_alliance(1111, "TestAlliance")
            .await
            .unwrap();
        alliance_service.activate(1111, alliance.id).await.unwrap();
        alliance_service.invite_member(1111, 2222).await.unwrap();

        let declined = alliance_service
            .respond_to_invite(2222, alliance.id, false)
            .await
            .unwrap();
        assert!(declined.is_none());

        // A second response has no invite to act on
        let repeat = alliance_service
            .respond_to_invite(2222, alliance.id, true)
            .await;
        assert!(matches!(
            repeat,
            Err(Error::SyncError(SyncError::InviteNotFound(_)))
        ));

        Ok(())
    }

    /// Only an accepted admin of the active alliance may change shared codes
    #[tokio::test]
    async fn shared_codes_require_admin() -> Result<(), DbErr> {
        let test = test_setup().await;
        let alliance_service = AllianceService::new(&test.state.db);

        test_setup_create_alliance(&test, "TestAlliance", &[1111, 2222])
            .await
            .unwrap();

        let result = alliance_service
            .set_shared_event_codes(2222, &["EVTX".to_string()])
            .await;

        assert!(matches!(result, Err(Error::SyncError(SyncError::NotAnAdmin(_)))));

        Ok(())
    }

    /// Removing a member clears their activation but not shared history
    #[tokio::test]
    async fn remove_member_clears_activation() -> Result<(), DbErr> {
        let test = test_setup().await;
        let alliance_service = AllianceService::new(&test.state.db);

        test_setup_create_alliance(&test, "TestAlliance", &[1111, 2222])
            .await
            .unwrap();

        alliance_service.remove_member(1111, 2222).await.unwrap();

        let scope = ScopeResolver::new(&test.state.db).resolve(2222).await.unwrap();
        assert!(scope.alliance.is_none());

        Ok(())
    }
}
