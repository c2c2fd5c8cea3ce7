/// Gateway operation that can be made to fail on the in-memory gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FaultOp {
    PersistedSession,
    SignIn,
    SignUp,
    SignOut,
    Refresh,
    Select(String),
    Insert(String),
    Update(String),
    Delete(String),
}

/// A call observed by the in-memory gateway, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    PersistedSession,
    SignIn { email: String },
    SignUp { email: String },
    SignOut,
    Refresh,
    Select { table: String },
    Insert { table: String },
    Update { table: String },
    Delete { table: String },
}

impl GatewayCall {
    pub fn select(table: &str) -> Self {
        GatewayCall::Select {
            table: table.to_string(),
        }
    }

    pub fn insert(table: &str) -> Self {
        GatewayCall::Insert {
            table: table.to_string(),
        }
    }

    pub fn update(table: &str) -> Self {
        GatewayCall::Update {
            table: table.to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            GatewayCall::PersistedSession
                | GatewayCall::SignIn { .. }
                | GatewayCall::SignUp { .. }
                | GatewayCall::SignOut
                | GatewayCall::Refresh
        )
    }
}
