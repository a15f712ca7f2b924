use crate::models::group::Group;
use crate::models::user::User;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// WAL operation types, one JSON object per line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WalOperation {
    CreateGroup {
        id: u64,
        name: String,
    },
    CreateUser {
        id: u64,
        email: String,
        #[serde(default)]
        first_name: String,
        #[serde(default)]
        last_name: String,
        password: String,
        is_staff: bool,
        is_active: bool,
        is_superuser: bool,
        date_joined: i64,
        last_login: Option<i64>,
    },
    JoinGroup {
        email: String,
        group: String,
    },
    RecordLogin {
        email: String,
        at: i64,
    },
}

impl WalOperation {
    /// Record for a freshly created user; memberships are logged separately
    pub fn create_user(user: &User) -> Self {
        WalOperation::CreateUser {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password: user.password.clone(),
            is_staff: user.is_staff,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            date_joined: user.date_joined,
            last_login: user.last_login,
        }
    }

    pub fn create_group(group: &Group) -> Self {
        WalOperation::CreateGroup {
            id: group.id,
            name: group.name.clone(),
        }
    }
}

/// Append-only operation log the stores are rebuilt from at startup
pub struct Wal {
    file: Mutex<File>,
    path: PathBuf,
}

impl Wal {
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open WAL file")?;

        Ok(Wal {
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log_operation(&self, op: &WalOperation) -> Result<()> {
        let line = serde_json::to_string(op).context("Failed to encode WAL operation")?;
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow!("WAL file lock poisoned"))?;
        writeln!(file, "{}", line).context("Failed to write to WAL")?;
        file.flush().context("Failed to flush WAL")?;
        Ok(())
    }

    pub fn replay(&self) -> Result<Vec<WalOperation>> {
        let file = File::open(&self.path).context("Failed to open WAL for replay")?;
        let reader = BufReader::new(file);
        let mut operations = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from WAL")?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<WalOperation>(line) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse WAL line, skipping"
                    );
                }
            }
        }

        Ok(operations)
    }
}
