#![deny(missing_docs)]
//! Standardized process initialization for the petstore binaries.
//! Loads `.env`, installs the panic hook and configures tracing for the current [Environment].

use petstore_env::Environment;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};
use tracing_tree::HierarchicalLayer;

/// Describes how a binary should be initialized
#[derive(Debug)]
pub struct PetstoreEntrypoint {
    env: Environment,
    /// options that only apply in local dev
    local: LocalOptions,
}

impl Default for PetstoreEntrypoint {
    fn default() -> Self {
        // .env has to be read before the environment is resolved
        dotenv::dotenv().ok();
        Self::new(Environment::new_or_prod())
    }
}

/// sentinel struct which guarantees that we called [PetstoreEntrypoint::init]
#[derive(Debug)]
pub struct InitializedEntrypoint(());

impl PetstoreEntrypoint {
    /// create a new instance of [Self] from an input [Environment]. Unlike [Default] this does
    /// not read `.env`.
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            local: Default::default(),
        }
    }

    /// The environment this entrypoint will initialize for
    pub fn environment(&self) -> Environment {
        self.env
    }

    /// consume self, initialize this binary, and return a proof that it was initialized
    pub fn init(self) -> InitializedEntrypoint {
        let env = self.env;
        std::panic::set_hook(Box::new(tracing_panic::panic_hook));

        match (self.env, self.local) {
            (Environment::Local, LocalOptions { tree_tracing: None }) => {
                tracing_subscriber::fmt()
                    .with_ansi(true)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .init();
            }
            (
                Environment::Local,
                LocalOptions {
                    tree_tracing: Some(indent),
                },
            ) => {
                let subscriber = Registry::default()
                    .with(EnvFilter::from_default_env())
                    .with(HierarchicalLayer::new(indent));
                if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
                    eprintln!("tracing subscriber was already set: {e}");
                }
            }
            (Environment::Production | Environment::Develop, _) => {
                tracing_subscriber::fmt()
                    .with_ansi(false)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true)
                    .init();
            }
        }

        tracing::debug!(environment = %env, "tracing initialized");
        InitializedEntrypoint(())
    }

    /// begin modifying the options for the local environment
    pub fn local(self) -> LocalOptionsBuilder {
        LocalOptionsBuilder {
            prev: self,
            next: Default::default(),
        }
    }
}

/// builder struct for modifying the local environment options
pub struct LocalOptionsBuilder {
    prev: PetstoreEntrypoint,
    next: LocalOptions,
}

impl LocalOptionsBuilder {
    /// print spans as an indented tree with the given indent width instead of the pretty formatter
    pub fn tree_tracing(mut self, val: Option<usize>) -> Self {
        self.next.tree_tracing = val;
        self
    }

    /// finish modifying the options for the local environment
    pub fn build(self) -> PetstoreEntrypoint {
        PetstoreEntrypoint {
            env: self.prev.env,
            local: self.next,
        }
    }
}

#[derive(Debug, Default)]
struct LocalOptions {
    tree_tracing: Option<usize>,
}
