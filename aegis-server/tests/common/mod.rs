use aegis_registry::ResourceId;
use aegis_server::config::{Config, JournalConfig, RegistrySettings};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub const ADMIN: &str = "0xadadadadadadadadadadadadadadadadadadadad";

pub fn principal(byte: u8) -> String {
    format!("0x{}", format!("{byte:02x}").repeat(20))
}

/// Hex form of a label-derived resource id
pub fn label_id(label: &str) -> String {
    ResourceId::from_label(label).unwrap().to_hex()
}

pub struct TestServer {
    pub url: String,
    #[allow(dead_code)]
    pub addr: SocketAddr,
}

impl TestServer {
    pub async fn start() -> Self {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 0, // OS assigns port
            journal: JournalConfig::default(),
            registry: RegistrySettings {
                administrator: Some(ADMIN.into()),
                strict_owner_binding: false,
            },
        };

        let state = aegis_server::state::AppState::new(&config).await.unwrap();
        let app = aegis_server::routes::router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            url: format!("http://{addr}"),
            addr,
        }
    }
}
