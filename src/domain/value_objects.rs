use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 書籍ID - カタログの集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 貸出ID - 貸出記録の集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 返却状態
///
/// 三値の返却フラグ（未設定 / true / false）を列挙型で表現する。
/// 作成直後は`Outstanding`（未決定）で、返却済みでない扱いになる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReturnStatus {
    /// 返却の記録がまだない
    #[default]
    Outstanding,
    /// 返却済み
    Returned,
    /// 未返却として明示的に記録された
    NotReturned,
}

impl ReturnStatus {
    /// 返却済みか
    pub fn is_returned(&self) -> bool {
        matches!(self, ReturnStatus::Returned)
    }

    /// 永続化・APIで使う nullable boolean 表現
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ReturnStatus::Outstanding => None,
            ReturnStatus::Returned => Some(true),
            ReturnStatus::NotReturned => Some(false),
        }
    }

    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            None => ReturnStatus::Outstanding,
            Some(true) => ReturnStatus::Returned,
            Some(false) => ReturnStatus::NotReturned,
        }
    }
}

impl From<bool> for ReturnStatus {
    fn from(returned: bool) -> Self {
        Self::from_flag(Some(returned))
    }
}
