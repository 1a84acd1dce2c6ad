use crate::application_impl::user_service_impl::normalize_email;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

pub struct RealAuthService {
    user_repo: Arc<dyn UserRepo>,
    user_service: Arc<dyn UserService>,
    credential_hasher: Arc<dyn CredentialHasher>,
    session_manager: Arc<dyn SessionManager>,
}

impl RealAuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        user_service: Arc<dyn UserService>,
        credential_hasher: Arc<dyn CredentialHasher>,
        session_manager: Arc<dyn SessionManager>,
    ) -> Self {
        Self {
            user_repo,
            user_service,
            credential_hasher,
            session_manager,
        }
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn register(&self, request: RegisterInput) -> Result<User, AuthError> {
        let RegisterInput {
            name,
            email,
            password,
        } = request;

        let user = self
            .user_service
            .create_user(CreateUserInput {
                name,
                email,
                password,
            })
            .await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput { email, password } = request;

        // unknown email and wrong password look the same to the caller
        let user = self
            .user_repo
            .find_one(&UserFilter::Email(normalize_email(&email)))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let ok = self
            .credential_hasher
            .verify_password(&password, &user.password_hash)
            .await?;
        if !ok {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.session_manager.login(user.id).await?;
        info!(user_id = %user.id, "user logged in");

        Ok(LoginResult {
            user_id: user.id,
            tokens,
        })
    }

    async fn profile(&self, user_id: UserId) -> Result<User, AuthError> {
        Ok(self.user_service.get_user(user_id).await?)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken, AuthError> {
        Ok(self.session_manager.refresh(refresh_token).await?)
    }

    async fn logout(&self, user_id: UserId) -> Result<(), AuthError> {
        self.session_manager.revoke(user_id).await?;
        info!(%user_id, "user logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::RealUserService;
    use crate::application_impl::test_support::{PlainHasher, memory_sessions};
    use crate::infra_memory::MemoryUserRepo;

    fn service() -> (RealAuthService, Arc<dyn SessionManager>) {
        let repo: Arc<dyn UserRepo> = Arc::new(MemoryUserRepo::new());
        let hasher: Arc<dyn CredentialHasher> = Arc::new(PlainHasher);
        let sessions: Arc<dyn SessionManager> = memory_sessions();
        let users: Arc<dyn UserService> = Arc::new(RealUserService::new(repo.clone(), hasher.clone()));
        (
            RealAuthService::new(repo, users, hasher, sessions.clone()),
            sessions,
        )
    }

    fn register_input() -> RegisterInput {
        RegisterInput {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            password: "hopper123".to_string(),
        }
    }

    #[tokio::test]
    async fn register_login_profile_logout() {
        let (auth, sessions) = service();
        let user = auth.register(register_input()).await.unwrap();

        let login = auth
            .login(LoginInput {
                email: "GRACE@example.com".to_string(),
                password: "hopper123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.user_id, user.id);

        let subject = sessions
            .validate_access(&login.tokens.access_token.0)
            .await
            .unwrap();
        assert_eq!(auth.profile(subject).await.unwrap().email, "grace@example.com");

        let access = auth
            .refresh_token(&login.tokens.refresh_token.0)
            .await
            .unwrap();
        assert_eq!(sessions.validate_access(&access.0).await, Ok(user.id));

        auth.logout(user.id).await.unwrap();
        assert!(matches!(
            auth.refresh_token(&login.tokens.refresh_token.0).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let (auth, _) = service();
        auth.register(register_input()).await.unwrap();

        let wrong_password = auth
            .login(LoginInput {
                email: "grace@example.com".to_string(),
                password: "nope-nope".to_string(),
            })
            .await;
        let unknown_email = auth
            .login(LoginInput {
                email: "nobody@example.com".to_string(),
                password: "hopper123".to_string(),
            })
            .await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_registration_is_user_exists() {
        let (auth, _) = service();
        auth.register(register_input()).await.unwrap();
        assert!(matches!(
            auth.register(register_input()).await,
            Err(AuthError::UserExists)
        ));
    }

    #[tokio::test]
    async fn profile_of_unknown_user_is_not_found() {
        let (auth, _) = service();
        assert!(matches!(
            auth.profile(UserId::new_v4()).await,
            Err(AuthError::UserNotFound)
        ));
    }
}
