//! Property-based tests for the client cache
//!
//! However many callers race on however many addresses, each address ends up
//! with exactly one client and one dial.

use proptest::prelude::*;
use std::sync::Arc;

use mpd_protocol::mock::MockServer;
use mpd_sdk::{ClientCache, ClientOptions};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_get_or_create_dials_once_per_address(
        callers in 1usize..24,
        addresses in 1usize..5,
    ) {
        runtime().block_on(async {
            let server = MockServer::new();
            let cache = Arc::new(ClientCache::new(Arc::new(server.dialer())));

            let mut handles = Vec::new();
            for i in 0..callers {
                let cache = Arc::clone(&cache);
                let address = format!("host-{}:6600", i % addresses);
                handles.push(tokio::spawn(async move {
                    cache
                        .get_or_create("tcp", &address, ClientOptions::blocking().with_keepalive(false))
                        .await
                }));
            }

            let mut entries = Vec::new();
            for handle in handles {
                entries.push(handle.await.unwrap().unwrap());
            }

            let distinct = callers.min(addresses);
            assert_eq!(server.dial_count() as usize, distinct);
            assert_eq!(cache.len().await, distinct);

            for a in &entries {
                for b in &entries {
                    assert_eq!(a.addr() == b.addr(), Arc::ptr_eq(a, b));
                }
            }

            cache.shutdown().await;
            assert_eq!(server.open_connections(), 0);
        });
    }
}
