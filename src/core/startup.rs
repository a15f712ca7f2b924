use anyhow::Result;
use tracing::warn;

use crate::core::state::AppState;
use crate::models::group::Group;
use crate::models::user::User;
use crate::wal::wal::WalOperation;

// this runs at boot time, before the listeners start
pub fn apply_wal_operations(state: &AppState, operations: &[WalOperation]) -> Result<()> {
    for op in operations {
        match op {
            WalOperation::CreateGroup { id, name } => {
                state.groups.restore(Group::new(*id, name.clone()));
            }
            WalOperation::CreateUser {
                id,
                email,
                first_name,
                last_name,
                password,
                is_staff,
                is_active,
                is_superuser,
                date_joined,
                last_login,
            } => {
                let user = User {
                    id: *id,
                    email: email.clone(),
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    password: password.clone(),
                    is_staff: *is_staff,
                    is_active: *is_active,
                    is_superuser: *is_superuser,
                    groups: Vec::new(),
                    last_login: *last_login,
                    date_joined: *date_joined,
                };

                if let Err(e) = state.users.restore(user) {
                    warn!(error = %e, "Skipping WAL user record");
                }
            }
            WalOperation::JoinGroup { email, group } => {
                let result = state.users.update(email, |user| {
                    if !user.in_group(group) {
                        user.groups.push(group.clone());
                    }
                });

                if let Err(e) = result {
                    warn!(error = %e, group = %group, "Skipping WAL group membership");
                }
            }
            WalOperation::RecordLogin { email, at } => {
                if let Err(e) = state.users.update(email, |user| user.last_login = Some(*at)) {
                    warn!(error = %e, "Skipping WAL login record");
                }
            }
        }
    }
    Ok(())
}
