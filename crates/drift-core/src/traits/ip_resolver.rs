// # IP Resolver Trait
//
// Defines the interface for discovering the host's current public IP address.
//
// ## Implementations
//
// - HTTP echo service: `drift-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use drift_core::IpResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* IpResolver implementation */;
//
//     let desired = resolver.resolve().await?;
//     println!("public IP: {desired}");
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for public-IP resolver implementations
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Return the caller's current public IP address as reported by an
    /// external echo service.
    ///
    /// The value is an opaque address string. The reconciler compares it
    /// byte-for-byte against the published record content, so implementations
    /// must return exactly what the service reported and perform no
    /// normalization.
    ///
    /// No retry happens inside this call. A failed resolution fails the
    /// current reconciliation tick; the next tick tries again.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The current public IP address
    /// - `Err(Error)`: If the lookup failed (transport error, non-success
    ///   response, or malformed body)
    async fn resolve(&self) -> Result<String, crate::Error>;
}
