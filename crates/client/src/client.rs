//! The `MeetFlow` facade.
//!
//! Wires config, transport, session, and cache into the operations the
//! front ends call. Cached reads go through the coordinator under the same
//! query keys the original dashboards used; writes are optimistic
//! mutations with rollback.

use std::sync::Arc;

use meetflow_protocol::{
    AppointmentPage, BookingRequest, CreateAppointmentRequest, CreateServiceRequest, Profile,
    RegisterRequest, RegisterResponse, RequestPage, RequestStatus, Service, ServicePage,
    UpdateRequestRequest, WhoamiResponse,
};
use serde_json::{Value, json};

use crate::api;
use crate::cache::{CacheCoordinator, Mutation, QueryKey, Subscription};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::notify::{Notifier, NullNotifier, Severity};
use crate::session::SessionManager;
use crate::store::CredentialStore;
use crate::transport::{AuthHeaders, HttpTransport, Transport};

/// Client for the MeetFlow scheduling API.
///
/// Construct once per process and share by reference; all operations take
/// `&self`.
pub struct MeetFlow {
    transport: Arc<dyn Transport>,
    session: Arc<SessionManager>,
    cache: CacheCoordinator,
    notifier: Arc<dyn Notifier>,
}

impl MeetFlow {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_notifier(config, Arc::new(NullNotifier))
    }

    pub fn with_notifier(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let auth = Arc::new(AuthHeaders::new());
        let transport = Arc::new(HttpTransport::new(
            &config.base_url,
            config.request_timeout,
            Arc::clone(&auth),
        )?);
        let store = CredentialStore::load(&config.credentials_path);
        Ok(Self::with_transport(transport, auth, notifier, store, config.cache_capacity))
    }

    /// Assembles a client over an arbitrary transport. Embedders with their
    /// own HTTP stack plug in here; tests use it with the fake transport.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        auth: Arc<AuthHeaders>,
        notifier: Arc<dyn Notifier>,
        store: CredentialStore,
        cache_capacity: usize,
    ) -> Self {
        let session = Arc::new(SessionManager::new(
            Arc::clone(&transport),
            auth,
            Arc::clone(&notifier),
            store,
        ));
        Self {
            transport,
            session,
            cache: CacheCoordinator::with_capacity(cache_capacity),
            notifier,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn cache(&self) -> &CacheCoordinator {
        &self.cache
    }

    /// Watches a cached resource; see [`CacheCoordinator::subscribe`].
    pub fn subscribe(&self, key: &QueryKey) -> Subscription {
        self.cache.subscribe(key)
    }

    // --- session ---------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.session.login(email, password).await
    }

    pub fn sign_out(&self) {
        self.session.sign_out();
    }

    pub fn restore_session(&self) {
        self.session.restore_session();
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        api::auth::register(self.transport.as_ref(), request).await
    }

    /// Fetches the full account record for the active session.
    pub async fn whoami(&self) -> Result<WhoamiResponse> {
        let refresh = self
            .session
            .refresh_token()
            .ok_or_else(|| Error::Authentication("no active session".to_string()))?;
        api::account::whoami(self.transport.as_ref(), &refresh).await
    }

    fn current_user_id(&self) -> Result<String> {
        self.session
            .user()
            .map(|user| user.id)
            .ok_or_else(|| Error::Authentication("no active session".to_string()))
    }

    // --- profile ---------------------------------------------------------

    /// Cached read of the active user's profile.
    pub async fn profile(&self) -> Result<Profile> {
        let id = self.current_user_id()?;
        let key = QueryKey::scoped("profile", &id);
        let value = self
            .cache
            .query(&key, || async {
                let profile = api::profile::get(self.transport.as_ref(), &id).await?;
                to_value(&profile)
            })
            .await?;
        from_value(value)
    }

    /// Optimistically updates the profile.
    ///
    /// The new profile is visible to readers immediately; if the remote
    /// rejects it the previous profile is restored, a single failure
    /// notification is emitted, and the error returned.
    pub async fn update_profile(&self, profile: Profile) -> Result<Profile> {
        let id = self.current_user_id()?;
        let key = QueryKey::scoped("profile", &id);
        let pending = to_value(&profile)?;
        let value = self
            .cache
            .mutate(Mutation::new(key, pending), || async {
                let echoed = api::profile::update(self.transport.as_ref(), &id, &profile).await?;
                echoed.as_ref().map(to_value).transpose()
            })
            .await
            .inspect_err(|_| {
                self.notifier
                    .notify("Profile update failed; your changes were reverted", Severity::Error);
            })?;
        from_value(value)
    }

    /// Attaches a profile photo, then refetches the profile on next read.
    pub async fn attach_photo(&self, photo_url: &str) -> Result<()> {
        let id = self.current_user_id()?;
        api::profile::attach_photo(self.transport.as_ref(), &id, photo_url).await?;
        self.cache.invalidate(&QueryKey::scoped("profile", &id));
        Ok(())
    }

    // --- services --------------------------------------------------------

    /// Cached page of the active user's service catalog.
    pub async fn services(&self, page: u32) -> Result<ServicePage> {
        let id = self.current_user_id()?;
        let key = QueryKey::scoped("servicesProfile", format!("{id}:{page}"));
        let value = self
            .cache
            .query(&key, || async {
                let services = api::services::page(self.transport.as_ref(), &id, page).await?;
                to_value(&services)
            })
            .await?;
        from_value(value)
    }

    pub async fn create_service(&self, request: &CreateServiceRequest) -> Result<Service> {
        self.current_user_id()?;
        let service = api::services::create(self.transport.as_ref(), request).await?;
        self.cache.invalidate_matching(&QueryKey::new("servicesProfile"));
        Ok(service)
    }

    // --- booking requests ------------------------------------------------

    /// Cached page of pending booking requests for the active schedule.
    pub async fn pending_requests(&self, page: u32) -> Result<RequestPage> {
        let id = self.current_user_id()?;
        let key = QueryKey::scoped("servicesRequest", format!("{id}:{page}"));
        let value = self
            .cache
            .query(&key, || async {
                let requests =
                    api::requests::page(self.transport.as_ref(), &id, page, Some(RequestStatus::Requested))
                        .await?;
                to_value(&requests)
            })
            .await?;
        from_value(value)
    }

    /// Cached page of already-scheduled requests.
    pub async fn scheduled_requests(&self, page: u32) -> Result<RequestPage> {
        let id = self.current_user_id()?;
        let key = QueryKey::scoped("servicesScheduled", format!("{id}:{page}"));
        let value = self
            .cache
            .query(&key, || async {
                let requests =
                    api::requests::page(self.transport.as_ref(), &id, page, Some(RequestStatus::Scheduled))
                        .await?;
                to_value(&requests)
            })
            .await?;
        from_value(value)
    }

    /// Accepts a booking request: books the appointment, then flips the
    /// request status optimistically.
    pub async fn accept_request(&self, request: &BookingRequest, service_id: &str) -> Result<()> {
        api::appointments::create(
            self.transport.as_ref(),
            &CreateAppointmentRequest {
                request_id: request.id.clone(),
                service_id: service_id.to_string(),
                init_date: request.init_date.clone(),
                message: request.message.clone(),
            },
        )
        .await?;
        self.decide_request(&request.id, RequestStatus::Accepted).await
    }

    /// Declines a booking request optimistically.
    pub async fn decline_request(&self, request_id: &str) -> Result<()> {
        self.decide_request(request_id, RequestStatus::Declined).await
    }

    /// Flips a request's status with optimistic feedback; every cached
    /// page of the scheduled and pending listings is marked stale once the
    /// remote confirms. A rejected update is rolled back and emits a
    /// single failure notification.
    async fn decide_request(&self, request_id: &str, status: RequestStatus) -> Result<()> {
        let body = UpdateRequestRequest { id: request_id.to_string(), status };
        let mutation = Mutation::new(
            QueryKey::scoped("request", request_id),
            json!({ "_id": request_id, "status": status }),
        )
        .invalidating(QueryKey::new("servicesScheduled"))
        .invalidating(QueryKey::new("servicesRequest"));

        self.cache
            .mutate(mutation, || async {
                let echoed = api::requests::update(self.transport.as_ref(), &body).await?;
                echoed.as_ref().map(to_value).transpose()
            })
            .await
            .inspect_err(|_| {
                self.notifier
                    .notify("Request update failed; the status was reverted", Severity::Error);
            })?;
        Ok(())
    }

    /// Books an appointment directly and refetches the schedule on next
    /// read.
    pub async fn book_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<Option<meetflow_protocol::Appointment>> {
        self.current_user_id()?;
        let appointment = api::appointments::create(self.transport.as_ref(), request).await?;
        self.cache.invalidate_matching(&QueryKey::new("mySchedule"));
        Ok(appointment)
    }

    // --- schedule --------------------------------------------------------

    /// Cached page of the active user's confirmed appointments.
    pub async fn schedule(&self, page: u32) -> Result<AppointmentPage> {
        let id = self.current_user_id()?;
        let key = QueryKey::scoped("mySchedule", format!("{id}:{page}"));
        let value = self
            .cache
            .query(&key, || async {
                let appointments = api::appointments::page(self.transport.as_ref(), &id, page).await?;
                to_value(&appointments)
            })
            .await?;
        from_value(value)
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::Storage(e.to_string()))
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EntryState;
    use crate::notify::testing::RecordingNotifier;
    use crate::transport::FakeTransport;
    use tempfile::TempDir;

    struct Harness {
        transport: Arc<FakeTransport>,
        notifier: Arc<RecordingNotifier>,
        client: MeetFlow,
        _tmp: TempDir,
    }

    impl Harness {
        async fn logged_in() -> Self {
            let tmp = TempDir::new().unwrap();
            let transport = Arc::new(FakeTransport::new());
            let notifier = Arc::new(RecordingNotifier::default());
            let client = MeetFlow::with_transport(
                Arc::clone(&transport) as Arc<dyn Transport>,
                Arc::new(AuthHeaders::new()),
                Arc::clone(&notifier) as Arc<dyn Notifier>,
                CredentialStore::load(tmp.path().join("credentials.json")),
                16,
            );
            transport.push_json(
                200,
                json!({
                    "accessToken": "T",
                    "refreshToken": "R",
                    "user": {"_id": "u1", "email": "a@b.com", "role": "professional"}
                }),
            );
            client.login("a@b.com", "secret").await.unwrap();
            transport.take_sent();
            notifier.messages.lock().clear();
            Self { transport, notifier, client, _tmp: tmp }
        }
    }

    fn profile_body() -> Value {
        json!({"name": "Ana", "email": "a@b.com", "headLine": "Therapist", "photoUrl": null})
    }

    #[tokio::test]
    async fn profile_is_fetched_once_and_cached() {
        let h = Harness::logged_in().await;
        h.transport.push_json(200, profile_body());

        let first = h.client.profile().await.unwrap();
        let second = h.client.profile().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.head_line.as_deref(), Some("Therapist"));

        let sent = h.transport.take_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "profile/u1");
    }

    #[tokio::test]
    async fn rejected_profile_update_rolls_back() {
        let h = Harness::logged_in().await;
        h.transport.push_json(200, profile_body());
        let original = h.client.profile().await.unwrap();

        h.transport.push_error(Error::Api { status: 422, message: "invalid".to_string() });
        let mut edited = original.clone();
        edited.head_line = Some("Rewritten".to_string());
        let err = h.client.update_profile(edited).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 422, .. }));

        // Back to the pre-mutation profile without a refetch.
        h.transport.take_sent();
        let restored = h.client.profile().await.unwrap();
        assert_eq!(restored, original);
        assert!(h.transport.take_sent().is_empty());
    }

    #[tokio::test]
    async fn confirmed_update_keeps_optimistic_profile() {
        let h = Harness::logged_in().await;
        h.transport.push_json(200, profile_body());
        let mut edited = h.client.profile().await.unwrap();
        edited.head_line = Some("New line".to_string());

        h.transport.push_json(200, json!(null));
        let updated = h.client.update_profile(edited.clone()).await.unwrap();
        assert_eq!(updated, edited);

        let cached = h.client.profile().await.unwrap();
        assert_eq!(cached, edited);
    }

    #[tokio::test]
    async fn decline_marks_listings_stale_after_confirmation() {
        let h = Harness::logged_in().await;
        h.transport.push_json(200, json!({"requests": [], "total": 0}));
        h.client.scheduled_requests(1).await.unwrap();
        h.transport.push_json(200, json!({"requests": [], "total": 0}));
        h.client.pending_requests(1).await.unwrap();

        h.transport.push_json(200, json!(null));
        h.client.decline_request("r9").await.unwrap();

        let cache = h.client.cache();
        assert_eq!(
            cache.entry_state(&QueryKey::scoped("servicesScheduled", "u1:1")),
            Some(EntryState::Stale)
        );
        assert_eq!(
            cache.entry_state(&QueryKey::scoped("servicesRequest", "u1:1")),
            Some(EntryState::Stale)
        );

        let sent = h.transport.take_sent();
        let update = sent.last().unwrap();
        assert_eq!(update.path, "request/update");
        assert_eq!(update.body.as_ref().unwrap()["status"], "recusado");
    }

    #[tokio::test]
    async fn accept_books_appointment_before_updating_status() {
        let h = Harness::logged_in().await;
        let request = BookingRequest {
            id: "r9".to_string(),
            service_name: "Therapy".to_string(),
            client_name: "Bia".to_string(),
            message: Some("please".to_string()),
            duration: 60,
            init_date: "2026-09-01T10:00:00Z".to_string(),
            status: RequestStatus::Requested,
        };
        h.transport.push_json(201, json!(null));
        h.transport.push_json(200, json!(null));

        h.client.accept_request(&request, "s1").await.unwrap();

        let sent = h.transport.take_sent();
        assert_eq!(sent[0].path, "appointment/create");
        assert_eq!(sent[1].path, "request/update");
        assert_eq!(sent[1].body.as_ref().unwrap()["status"], "aceito");
    }

    #[tokio::test]
    async fn rejected_mutation_emits_exactly_one_failure_notification() {
        let h = Harness::logged_in().await;
        h.transport.push_json(200, profile_body());
        let mut edited = h.client.profile().await.unwrap();
        edited.head_line = Some("Rewritten".to_string());

        h.transport.push_error(Error::Network("down".to_string()));
        h.client.update_profile(edited).await.unwrap_err();

        let messages = h.notifier.messages.lock();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, crate::notify::Severity::Error);
    }

    #[tokio::test]
    async fn rejected_decline_notifies_and_reverts() {
        let h = Harness::logged_in().await;
        h.transport.push_error(Error::Api { status: 500, message: "boom".to_string() });

        h.client.decline_request("r9").await.unwrap_err();

        let messages = h.notifier.messages.lock();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, crate::notify::Severity::Error);
        assert!(h.client.cache().peek(&QueryKey::scoped("request", "r9")).is_none());
    }

    #[tokio::test]
    async fn request_pages_are_cached_per_page() {
        let h = Harness::logged_in().await;
        h.transport.push_json(
            200,
            json!({"requests": [{
                "_id": "p1", "serviceName": "Therapy", "clientName": "Bia",
                "duration": 60, "initDate": "2026-09-01T10:00:00Z", "status": "solicitado"
            }]}),
        );
        h.transport.push_json(
            200,
            json!({"requests": [{
                "_id": "p2", "serviceName": "Therapy", "clientName": "Caio",
                "duration": 30, "initDate": "2026-09-02T10:00:00Z", "status": "solicitado"
            }]}),
        );

        let first = h.client.pending_requests(1).await.unwrap();
        let second = h.client.pending_requests(2).await.unwrap();
        assert_eq!(first.requests[0].id, "p1");
        assert_eq!(second.requests[0].id, "p2");

        let sent = h.transport.take_sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].query.contains(&("page".to_string(), "2".to_string())));

        // Both pages stay cached independently.
        h.client.pending_requests(1).await.unwrap();
        h.client.pending_requests(2).await.unwrap();
        assert!(h.transport.take_sent().is_empty());
    }

    #[tokio::test]
    async fn operations_without_a_session_fail_fast() {
        let tmp = TempDir::new().unwrap();
        let transport = Arc::new(FakeTransport::new());
        let client = MeetFlow::with_transport(
            Arc::clone(&transport) as Arc<dyn Transport>,
            Arc::new(AuthHeaders::new()),
            Arc::new(NullNotifier),
            CredentialStore::load(tmp.path().join("credentials.json")),
            16,
        );

        assert!(client.profile().await.unwrap_err().is_authentication());
        assert!(client.whoami().await.unwrap_err().is_authentication());
        assert!(transport.take_sent().is_empty());
    }
}
