//! Scenario tests for the auth crate
//!
//! End-to-end flows over the in-memory store: registration, login,
//! rotation, logout, and the audit trail. Each scenario exercises a
//! lifecycle guarantee rather than a single function.

mod support {
    use std::sync::Arc;

    use platform::client::{ClientContext, DeviceId};

    use crate::application::{
        AuthConfig, LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput,
        RegisterUseCase, SessionOutput, TokenIssuer, ValidateAccessUseCase,
    };
    use crate::domain::entity::IdentityProfile;
    use crate::error::AuthResult;
    use crate::infra::memory::MemoryAuthStore;

    pub struct Harness {
        pub store: Arc<MemoryAuthStore>,
        pub config: Arc<AuthConfig>,
        pub issuer: Arc<TokenIssuer>,
    }

    impl Harness {
        pub fn new() -> Self {
            let config = Arc::new(AuthConfig::with_random_secret());
            let issuer = Arc::new(TokenIssuer::new(&config));
            Self {
                store: Arc::new(MemoryAuthStore::with_roles(&["ROLE_USER", "ROLE_ADMIN"])),
                config,
                issuer,
            }
        }

        /// Harness over an empty store (no seeded roles)
        pub fn without_roles() -> Self {
            let config = Arc::new(AuthConfig::with_random_secret());
            let issuer = Arc::new(TokenIssuer::new(&config));
            Self {
                store: Arc::new(MemoryAuthStore::new()),
                config,
                issuer,
            }
        }

        pub fn register_use_case(&self) -> RegisterUseCase<MemoryAuthStore, MemoryAuthStore> {
            RegisterUseCase::new(
                Arc::clone(&self.store),
                Arc::clone(&self.store),
                Arc::clone(&self.config),
            )
        }

        pub fn login_use_case(
            &self,
        ) -> LoginUseCase<MemoryAuthStore, MemoryAuthStore, MemoryAuthStore> {
            LoginUseCase::new(
                Arc::clone(&self.store),
                Arc::clone(&self.store),
                Arc::clone(&self.store),
                Arc::clone(&self.issuer),
                Arc::clone(&self.config),
            )
        }

        pub fn refresh_use_case(
            &self,
        ) -> RefreshUseCase<MemoryAuthStore, MemoryAuthStore, MemoryAuthStore> {
            RefreshUseCase::new(
                Arc::clone(&self.store),
                Arc::clone(&self.store),
                Arc::clone(&self.store),
                Arc::clone(&self.issuer),
                Arc::clone(&self.config),
            )
        }

        pub fn logout_use_case(&self) -> LogoutUseCase<MemoryAuthStore, MemoryAuthStore> {
            LogoutUseCase::new(
                Arc::clone(&self.store),
                Arc::clone(&self.store),
                Arc::clone(&self.config),
            )
        }

        pub fn validate_use_case(&self) -> ValidateAccessUseCase {
            ValidateAccessUseCase::new(Arc::clone(&self.issuer))
        }

        pub async fn register(&self, email: &str, password: &str) -> IdentityProfile {
            self.register_use_case()
                .execute(RegisterInput {
                    email: email.to_string(),
                    password: password.to_string(),
                    name: "Test User".to_string(),
                    age: Some(30),
                })
                .await
                .unwrap()
                .identity
        }

        pub async fn login(
            &self,
            email: &str,
            password: &str,
            device: &str,
        ) -> AuthResult<SessionOutput> {
            self.login_use_case()
                .execute(
                    LoginInput {
                        email: email.to_string(),
                        password: password.to_string(),
                    },
                    &ctx(device),
                )
                .await
        }

        /// Register and log in, returning the opened session
        pub async fn session(&self, email: &str, password: &str, device: &str) -> SessionOutput {
            self.register(email, password).await;
            self.login(email, password, device).await.unwrap()
        }
    }

    pub fn ctx(device: &str) -> ClientContext {
        ClientContext::new(DeviceId::new(device).unwrap(), None)
    }

    pub fn ctx_with_ip(device: &str, ip: &str) -> ClientContext {
        ClientContext::new(DeviceId::new(device).unwrap(), Some(ip.parse().unwrap()))
    }
}

mod registration_tests {
    use super::support::Harness;
    use crate::application::RegisterInput;
    use crate::domain::value_object::IdentityStatus;
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_register_assigns_default_role_and_active_status() {
        let harness = Harness::new();
        let profile = harness.register("a@x.com", "correct horse battery").await;

        assert_eq!(profile.email.as_str(), "a@x.com");
        assert_eq!(profile.status, IdentityStatus::Active);
        assert_eq!(profile.roles.len(), 1);
        assert_eq!(profile.roles[0].as_str(), "ROLE_USER");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let harness = Harness::new();
        harness.register("a@x.com", "correct horse battery").await;

        let result = harness
            .register_use_case()
            .execute(RegisterInput {
                email: "a@x.com".to_string(),
                password: "a different password".to_string(),
                name: "Other".to_string(),
                age: None,
            })
            .await;

        assert!(matches!(result, Err(AuthError::DuplicateIdentity)));
    }

    #[tokio::test]
    async fn test_emails_differing_in_case_are_distinct() {
        let harness = Harness::new();
        harness.register("a@x.com", "correct horse battery").await;

        // Stored byte-for-byte; the uppercased variant is a new account
        let profile = harness.register("A@X.com", "correct horse battery").await;
        assert_eq!(profile.email.as_str(), "A@X.com");
    }

    #[tokio::test]
    async fn test_policy_violating_password_rejected() {
        let harness = Harness::new();
        let result = harness
            .register_use_case()
            .execute(RegisterInput {
                email: "a@x.com".to_string(),
                password: "short".to_string(),
                name: "Test".to_string(),
                age: None,
            })
            .await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_default_role_is_a_configuration_error() {
        let harness = Harness::without_roles();
        let result = harness
            .register_use_case()
            .execute(RegisterInput {
                email: "a@x.com".to_string(),
                password: "correct horse battery".to_string(),
                name: "Test".to_string(),
                age: None,
            })
            .await;

        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }
}

mod login_tests {
    use super::support::Harness;
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_login_issues_access_and_refresh_tokens() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        assert!(!session.access_token.is_empty());
        assert_eq!(session.refresh_secret.as_str().len(), 86);

        let claims = harness
            .validate_use_case()
            .execute(&session.access_token)
            .unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.identity_id().unwrap(), session.identity.identity_id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let harness = Harness::new();
        harness.register("a@x.com", "correct horse battery").await;

        let result = harness.login("a@x.com", "wrong wrong wrong", "d1").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_identical() {
        let harness = Harness::new();
        harness.register("a@x.com", "correct horse battery").await;

        let unknown = harness
            .login("nobody@x.com", "correct horse battery", "d1")
            .await
            .unwrap_err();
        let mismatch = harness
            .login("a@x.com", "wrong wrong wrong", "d1")
            .await
            .unwrap_err();

        assert_eq!(unknown.to_app_error(), mismatch.to_app_error());
    }

    #[tokio::test]
    async fn test_relogin_on_same_device_displaces_previous_session() {
        let harness = Harness::new();
        let first = harness.session("a@x.com", "correct horse battery", "d1").await;
        let second = harness
            .login("a@x.com", "correct horse battery", "d1")
            .await
            .unwrap();

        assert_ne!(first.refresh_secret, second.refresh_secret);

        // The displaced secret can no longer be redeemed
        let result = harness
            .refresh_use_case()
            .execute(&first.refresh_secret, &super::support::ctx("d1"))
            .await;
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }
}

mod rotation_tests {
    use std::sync::Arc;

    use super::support::{Harness, ctx};
    use crate::domain::entity::RefreshToken;
    use crate::domain::value_object::RefreshSecret;
    use crate::error::AuthError;
    use platform::client::DeviceId;

    #[tokio::test]
    async fn test_rotation_replaces_the_secret() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        let rotated = harness
            .refresh_use_case()
            .execute(&session.refresh_secret, &ctx("d1"))
            .await
            .unwrap();

        assert_ne!(rotated.refresh_secret, session.refresh_secret);
        assert_eq!(rotated.identity.identity_id, session.identity.identity_id);

        // The new secret works; the consumed one does not
        let again = harness
            .refresh_use_case()
            .execute(&rotated.refresh_secret, &ctx("d1"))
            .await;
        assert!(again.is_ok());

        let replayed = harness
            .refresh_use_case()
            .execute(&session.refresh_secret, &ctx("d1"))
            .await;
        assert!(matches!(replayed, Err(AuthError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_concurrent_redeem_admits_exactly_one_winner() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        let refresh = Arc::new(harness.refresh_use_case());
        let mut handles = Vec::new();
        for _ in 0..2 {
            let refresh = Arc::clone(&refresh);
            let secret = session.refresh_secret.clone();
            handles.push(tokio::spawn(async move {
                refresh.execute(&secret, &ctx("d1")).await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn test_wrong_device_indistinguishable_from_unknown_secret() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        let wrong_device = harness
            .refresh_use_case()
            .execute(&session.refresh_secret, &ctx("d2"))
            .await
            .unwrap_err();
        let unknown = harness
            .refresh_use_case()
            .execute(&RefreshSecret::generate(), &ctx("d1"))
            .await
            .unwrap_err();

        // Internally distinct, externally one rejection
        assert!(matches!(wrong_device, AuthError::TokenInvalid));
        assert!(matches!(unknown, AuthError::TokenNotFound));
        assert_eq!(wrong_device.to_app_error(), unknown.to_app_error());
    }

    #[tokio::test]
    async fn test_wrong_device_does_not_consume_the_token() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        harness
            .refresh_use_case()
            .execute(&session.refresh_secret, &ctx("d2"))
            .await
            .unwrap_err();

        // Still redeemable from the bound device
        let rotated = harness
            .refresh_use_case()
            .execute(&session.refresh_secret, &ctx("d1"))
            .await;
        assert!(rotated.is_ok());
    }

    #[tokio::test]
    async fn test_expired_refresh_token_rejected() {
        let harness = Harness::new();
        let profile = harness.register("a@x.com", "correct horse battery").await;

        let secret = RefreshSecret::generate();
        let token = RefreshToken::new(
            profile.identity_id,
            secret.clone(),
            DeviceId::new("d1").unwrap(),
            None,
            chrono::Duration::seconds(-5),
        );
        harness.store.put_token(token).await;

        let result = harness.refresh_use_case().execute(&secret, &ctx("d1")).await;
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }
}

mod store_tests {
    use super::support::{Harness, ctx};
    use crate::domain::repository::RefreshTokenRepository;
    use crate::domain::value_object::RefreshSecret;

    #[tokio::test]
    async fn test_presented_secret_string_round_trips() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        // What a transport hands back: the raw string, re-wrapped
        let presented = RefreshSecret::from_presented(session.refresh_secret.as_str());
        let rotated = harness.refresh_use_case().execute(&presented, &ctx("d1")).await;
        assert!(rotated.is_ok());
    }

    #[tokio::test]
    async fn test_lifecycle_retains_rows_but_purge_deletes_them() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        harness
            .refresh_use_case()
            .execute(&session.refresh_secret, &ctx("d1"))
            .await
            .unwrap();
        harness
            .logout_use_case()
            .execute_all(&session.identity.identity_id, None)
            .await
            .unwrap();

        // Revoked rows are history, not garbage
        let rows = harness.store.token_rows().await;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|t| t.revoked));

        let purged = harness
            .store
            .purge_for_identity(&session.identity.identity_id)
            .await
            .unwrap();
        assert_eq!(purged, 2);
        assert!(harness.store.token_rows().await.is_empty());
    }
}

mod logout_tests {
    use super::support::{Harness, ctx};
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_logout_ends_only_that_device_session() {
        let harness = Harness::new();
        let d1 = harness.session("a@x.com", "correct horse battery", "d1").await;
        let d2 = harness
            .login("a@x.com", "correct horse battery", "d2")
            .await
            .unwrap();

        harness
            .logout_use_case()
            .execute(&d1.refresh_secret, &ctx("d1"))
            .await
            .unwrap();

        // d1's session is dead, d2's still rotates
        let dead = harness
            .refresh_use_case()
            .execute(&d1.refresh_secret, &ctx("d1"))
            .await;
        assert!(matches!(dead, Err(AuthError::TokenInvalid)));

        let alive = harness
            .refresh_use_case()
            .execute(&d2.refresh_secret, &ctx("d2"))
            .await;
        assert!(alive.is_ok());
    }

    #[tokio::test]
    async fn test_logout_requires_the_bound_device() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        let result = harness
            .logout_use_case()
            .execute(&session.refresh_secret, &ctx("d2"))
            .await;
        assert!(matches!(result, Err(AuthError::TokenNotFound)));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_once_the_row_exists() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        let logout = harness.logout_use_case();
        logout.execute(&session.refresh_secret, &ctx("d1")).await.unwrap();
        logout.execute(&session.refresh_secret, &ctx("d1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_all_kills_every_device() {
        let harness = Harness::new();
        let d1 = harness.session("a@x.com", "correct horse battery", "d1").await;
        let d2 = harness
            .login("a@x.com", "correct horse battery", "d2")
            .await
            .unwrap();

        let revoked = harness
            .logout_use_case()
            .execute_all(&d1.identity.identity_id, None)
            .await
            .unwrap();
        assert_eq!(revoked, 2);

        for (secret, device) in [(&d1.refresh_secret, "d1"), (&d2.refresh_secret, "d2")] {
            let result = harness.refresh_use_case().execute(secret, &ctx(device)).await;
            assert!(matches!(result, Err(AuthError::TokenInvalid)));
        }
    }

    #[tokio::test]
    async fn test_logout_all_is_idempotent() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        let logout = harness.logout_use_case();
        assert_eq!(
            logout.execute_all(&session.identity.identity_id, None).await.unwrap(),
            1
        );
        assert_eq!(
            logout.execute_all(&session.identity.identity_id, None).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_access_token_outlives_logout() {
        let harness = Harness::new();
        let session = harness.session("a@x.com", "correct horse battery", "d1").await;

        harness
            .logout_use_case()
            .execute_all(&session.identity.identity_id, None)
            .await
            .unwrap();

        // Stateless access tokens stay valid until their own expiry
        assert!(
            harness
                .validate_use_case()
                .execute(&session.access_token)
                .is_ok()
        );
    }
}

mod audit_tests {
    use std::sync::Arc;

    use super::support::{Harness, ctx, ctx_with_ip};
    use crate::application::{LoginInput, LoginUseCase};
    use crate::domain::entity::{AuditEvent, AuditEventType};
    use crate::domain::repository::AuditRepository;
    use crate::error::{AuthError, AuthResult};

    /// Audit sink that always fails
    struct FailingAudit;

    impl AuditRepository for FailingAudit {
        async fn append(&self, _event: &AuditEvent) -> AuthResult<()> {
            Err(AuthError::Internal("audit sink down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_lifecycle_leaves_an_event_trail() {
        let harness = Harness::new();
        let session = harness
            .session("a@x.com", "correct horse battery", "d1")
            .await;

        let rotated = harness
            .refresh_use_case()
            .execute(&session.refresh_secret, &ctx("d1"))
            .await
            .unwrap();
        harness
            .logout_use_case()
            .execute(&rotated.refresh_secret, &ctx("d1"))
            .await
            .unwrap();
        harness
            .logout_use_case()
            .execute_all(&session.identity.identity_id, None)
            .await
            .unwrap();

        let events: Vec<AuditEventType> = harness
            .store
            .audit_events()
            .await
            .iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(
            events,
            vec![
                AuditEventType::Login,
                AuditEventType::RefreshToken,
                AuditEventType::Logout,
                AuditEventType::LogoutAll,
            ]
        );
    }

    #[tokio::test]
    async fn test_audit_events_carry_the_origin_ip() {
        let harness = Harness::new();
        harness.register("a@x.com", "correct horse battery").await;
        harness
            .login_use_case()
            .execute(
                LoginInput {
                    email: "a@x.com".to_string(),
                    password: "correct horse battery".to_string(),
                },
                &ctx_with_ip("d1", "10.0.0.1"),
            )
            .await
            .unwrap();

        let events = harness.store.audit_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_fail_login() {
        let harness = Harness::new();
        harness.register("a@x.com", "correct horse battery").await;

        let login = LoginUseCase::new(
            Arc::clone(&harness.store),
            Arc::clone(&harness.store),
            Arc::new(FailingAudit),
            Arc::clone(&harness.issuer),
            Arc::clone(&harness.config),
        );

        let session = login
            .execute(
                LoginInput {
                    email: "a@x.com".to_string(),
                    password: "correct horse battery".to_string(),
                },
                &ctx("d1"),
            )
            .await;
        assert!(session.is_ok());
    }
}
