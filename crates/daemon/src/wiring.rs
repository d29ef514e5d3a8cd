// SPDX-License-Identifier: MIT

//! Assembles the `SubsystemRegistry` and every `SubsystemPlugin` named in
//! spec §3's SubsystemIdentity list, in dependency order, so
//! `SubsystemRegistry::register` always sees a prerequisite's name
//! already registered (spec §4.1).
//!
//! `"Registry"` itself is registered with no dependencies and never
//! admitted through the orchestrator (spec §4.3/§4.4): it bootstraps the
//! engine rather than being launched by it.

use std::collections::HashMap;
use std::sync::Arc;

use hydrogen_readiness::SubsystemPlugin;
use hydrogen_registry::SubsystemRegistry;
use hydrogen_subsystems::{
    ApiPlugin, DatabasePlugin, LoggingPlugin, MailRelayPlugin, MdnsClientPlugin,
    MdnsServerPlugin, NetworkPlugin, NotifyPlugin, OidcPlugin, PayloadPlugin, PrintPlugin,
    ResourcesPlugin, SwaggerPlugin, TerminalPlugin, ThreadsPlugin, WebServerPlugin,
    WebSocketPlugin,
};

use crate::error::DaemonError;

const REGISTRY_SUBSYSTEM: &str = "Registry";

/// Every registered subsystem, ready to drive through the orchestrator.
pub struct Wiring {
    pub registry: Arc<SubsystemRegistry>,
    pub plugins: HashMap<String, Arc<dyn SubsystemPlugin>>,
    /// Insertion order for `ReadinessEvaluator` (spec §4.2: "the
    /// evaluator owns the output strings' lifetimes", visited in the
    /// order the batch was assembled).
    pub ordered: Vec<Arc<dyn SubsystemPlugin>>,
}

pub fn build() -> Result<Wiring, DaemonError> {
    let registry = Arc::new(SubsystemRegistry::new());
    registry.register(REGISTRY_SUBSYSTEM, &[])?;

    let threads = Arc::new(ThreadsPlugin::new());
    let resources = Arc::new(ResourcesPlugin::new(threads.table()));

    let ordered: Vec<Arc<dyn SubsystemPlugin>> = vec![
        Arc::new(LoggingPlugin::new()),
        Arc::new(NetworkPlugin::new()),
        threads.clone(),
        resources.clone(),
        Arc::new(DatabasePlugin::new()),
        Arc::new(PayloadPlugin::new()),
        Arc::new(WebServerPlugin::new()),
        Arc::new(ApiPlugin::new()),
        Arc::new(SwaggerPlugin::new()),
        Arc::new(OidcPlugin::new()),
        Arc::new(WebSocketPlugin::new()),
        Arc::new(TerminalPlugin::new()),
        Arc::new(PrintPlugin::new()),
        Arc::new(MailRelayPlugin::new()),
        Arc::new(NotifyPlugin::new()),
        Arc::new(MdnsServerPlugin::new()),
        Arc::new(MdnsClientPlugin::new()),
    ];

    let mut plugins: HashMap<String, Arc<dyn SubsystemPlugin>> = HashMap::new();
    for plugin in &ordered {
        registry.register(plugin.name(), plugin.dependencies())?;
        plugins.insert(plugin.name().to_string(), Arc::clone(plugin));
    }

    Ok(Wiring {
        registry,
        plugins,
        ordered,
    })
}
