use inventory_service::config::{
    LookupSettings, MongoSettings, ServerSettings, Settings, StorageBackend, StorageSettings,
};
use inventory_service::startup::Application;
use secrecy::Secret;

pub const TEST_USER_ID: &str = "test_user_123";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the app on a random port with the in-memory storage backend.
    pub async fn spawn() -> Self {
        // No lookup tests should hit the real provider; point at a closed
        // local port unless a mock server is supplied.
        Self::spawn_with_lookup("http://127.0.0.1:9").await
    }

    pub async fn spawn_with_lookup(lookup_base_url: &str) -> Self {
        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            storage: StorageSettings {
                backend: StorageBackend::Memory,
                mongodb: MongoSettings {
                    uri: "mongodb://localhost:27017".to_string(),
                    database: "inventory_test".to_string(),
                },
            },
            lookup: LookupSettings {
                base_url: lookup_base_url.to_string(),
                api_key: Secret::new("test-key".to_string()),
            },
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            client: reqwest::Client::new(),
        }
    }

    pub async fn create_product(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/products", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute create product request")
    }

    pub async fn create_profile(&self) -> reqwest::Response {
        self.client
            .put(format!("{}/profile", self.address))
            .header("X-User-ID", TEST_USER_ID)
            .json(&serde_json::json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "company_name": "Acme Retail",
                "company_address": "1 Main Street",
                "company_type": "retail"
            }))
            .send()
            .await
            .expect("Failed to execute create profile request")
    }
}
