//! Destination provider CLI commands
//!
//! Lists the upload destinations usable from this host.

use crate::error::WaypostResult;
use crate::providers::{PlatformCapabilities, ProviderRegistry};

/// Handle the providers command
///
/// The drive client library is loaded by the application shell; the CLI runs
/// without one, so the drive destination shows up as unavailable here.
pub fn handle_providers_command(all: bool) -> WaypostResult<()> {
    let registry = ProviderRegistry::new(PlatformCapabilities::detect(), None);

    let providers = if all {
        registry.all()
    } else {
        registry.list_available()
    };

    if providers.is_empty() {
        println!("No destinations are available on this host.");
        return Ok(());
    }

    println!("Destinations");
    println!("============");
    println!();

    for provider in &providers {
        let descriptor = provider.descriptor();
        let marker = if provider.is_available() {
            "available"
        } else {
            "unavailable"
        };

        if all {
            println!(
                "  {} {} ({}) [{}]",
                descriptor.icon_glyph, descriptor.display_name, descriptor.id, marker
            );
        } else {
            println!(
                "  {} {} ({})",
                descriptor.icon_glyph, descriptor.display_name, descriptor.id
            );
        }
        println!("      {}", descriptor.description);
    }

    println!();
    println!("Total: {} destination(s)", providers.len());

    Ok(())
}
