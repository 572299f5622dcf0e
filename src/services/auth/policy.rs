//! Which API operations exist, which need a token, and which need the admin role.

use std::collections::HashSet;

/// Every operation the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddPet,
    DeletePet,
    FindPets,
    FindPetById,
    RegisterUser,
    LoginUser,
    LogoutUser,
    GetCurrentUser,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::AddPet,
        Operation::DeletePet,
        Operation::FindPets,
        Operation::FindPetById,
        Operation::RegisterUser,
        Operation::LoginUser,
        Operation::LogoutUser,
        Operation::GetCurrentUser,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::AddPet => "addPet",
            Operation::DeletePet => "deletePet",
            Operation::FindPets => "findPets",
            Operation::FindPetById => "findPetById",
            Operation::RegisterUser => "registerUser",
            Operation::LoginUser => "loginUser",
            Operation::LogoutUser => "logoutUser",
            Operation::GetCurrentUser => "getCurrentUser",
        }
    }

    /// Whether the router runs the security gate for this operation.
    pub fn requires_token(self) -> bool {
        !matches!(
            self,
            Operation::RegisterUser | Operation::LoginUser | Operation::LogoutUser
        )
    }
}

/// Set of operations that require the "admin" role. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    elevated: HashSet<Operation>,
}

impl AuthorizationPolicy {
    pub fn new(elevated: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            elevated: elevated.into_iter().collect(),
        }
    }

    pub fn requires_admin(&self, operation: Operation) -> bool {
        self.elevated.contains(&operation)
    }
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self::new([Operation::AddPet, Operation::DeletePet])
    }
}
