//! The `Status` service: node and account lifecycle.
//!
//! Every method unpacks its argument, forwards to the [`StatusBackend`] and maps failures to the [`Error`] reported to the caller.

use statusd_types::api::{AccountArgs, AccountReply, ConfigArgs, NoArgs, NoReply};

use crate::{api::errors::Error, backend::StatusBackend, services::node_config::NodeConfig};

/// Lifecycle RPC methods.
#[derive(Debug, Clone, Default)]
pub struct StatusService {
    backend: StatusBackend,
}

impl StatusService {
    /// Creates the service around `backend`, or around a fresh backend with the in-process node manager if `None`.
    pub fn new(backend: Option<StatusBackend>) -> Self {
        backend.map(Self::with_backend).unwrap_or_default()
    }

    /// Creates the service around `backend`.
    pub fn with_backend(backend: StatusBackend) -> Self {
        Self { backend }
    }

    /// The backend the service forwards to.
    pub fn backend(&self) -> &StatusBackend {
        &self.backend
    }

    /// Parses the node config and starts a node with it.
    pub fn start_node(&self, args: ConfigArgs) -> Result<NoReply, Error> {
        let config = NodeConfig::load(&args.config)?;
        self.backend.start_node(config)?;
        Ok(NoReply {})
    }

    /// Stops the running node.
    pub fn stop_node(&self, _args: NoArgs) -> Result<NoReply, Error> {
        self.backend.stop_node()?;
        Ok(NoReply {})
    }

    /// Creates an account protected by the given password.
    pub fn create_account(&self, args: AccountArgs) -> Result<AccountReply, Error> {
        let created = self
            .backend
            .create_account(&args.password)
            .map_err(Error::AccountCreation)?;
        Ok(AccountReply {
            address: created.address.to_string(),
            public_key: created.public_key,
            mnemonic: created.mnemonic,
        })
    }

    /// Selects the addressed account.
    pub fn select_account(&self, args: AccountArgs) -> Result<NoReply, Error> {
        self.backend
            .select_account(&args.address, &args.password)
            .map_err(|err| Error::select_account(&args.address, err))?;
        Ok(NoReply {})
    }

    /// Clears the messaging identities and the selected account.
    pub fn logout(&self, _args: NoArgs) -> Result<NoReply, Error> {
        self.backend.logout().map_err(Error::LogoutFailed)?;
        Ok(NoReply {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::node_manager::NodeError;

    const CONFIG: &str = r#"{"NetworkId": 1, "DataDir": "/tmp", "ListenAddr": "127.0.0.1:0"}"#;

    fn running() -> StatusService {
        let service = StatusService::default();
        service
            .start_node(ConfigArgs {
                config: CONFIG.to_owned(),
            })
            .expect("can start");
        service
    }

    fn account_args(address: &str, password: &str) -> AccountArgs {
        AccountArgs {
            address: address.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn test_invalid_configuration() {
        let service = StatusService::new(None);
        for config in [r#"{"NetworkId": 0, "DataDir": "/tmp"}"#, "invalid json"] {
            let err = service
                .start_node(ConfigArgs {
                    config: config.to_owned(),
                })
                .expect_err("config is invalid");
            assert!(matches!(err, Error::InvalidConfiguration(_)));
            assert!(err.to_string().starts_with("invalid configuration: "));
        }
        assert!(!service.backend().provider().node_manager().is_running());
    }

    #[test]
    fn test_stop_never_started() {
        let service = StatusService::default();
        assert!(matches!(
            service.stop_node(NoArgs {}),
            Err(Error::Node(NodeError::NotRunning))
        ));
    }

    #[test]
    fn test_create_and_select() {
        let service = running();
        let reply = service
            .create_account(account_args("", "pw123"))
            .expect("can create");
        assert!(reply.address.starts_with("0x"));
        assert!(!reply.public_key.is_empty());
        assert!(!reply.mnemonic.is_empty());

        assert!(matches!(
            service.select_account(account_args(&reply.address, "wrong")),
            Err(Error::InvalidCredentials)
        ));
        service
            .select_account(account_args(&reply.address, "pw123"))
            .expect("can select");
        service.logout(NoArgs {}).expect("can logout");
    }

    #[test]
    fn test_unknown_address() {
        let service = running();
        let unknown = "0x0000000000000000000000000000000000000042";
        assert!(matches!(
            service.select_account(account_args(unknown, "pw")),
            Err(Error::UnknownAddress(address)) if address == unknown
        ));
    }

    #[test]
    fn test_create_without_node() {
        let service = StatusService::default();
        assert!(matches!(
            service.create_account(account_args("", "pw")),
            Err(Error::AccountCreation(_))
        ));
    }

    #[test]
    fn test_logout_without_node() {
        let service = StatusService::default();
        assert!(matches!(
            service.logout(NoArgs {}),
            Err(Error::LogoutFailed(_))
        ));
    }

    #[test]
    fn test_shared_backend() {
        let backend = StatusBackend::default();
        let service = StatusService::new(Some(backend.clone()));
        service
            .start_node(ConfigArgs {
                config: CONFIG.to_owned(),
            })
            .expect("can start");
        assert!(backend.provider().node_manager().is_running());
    }
}
