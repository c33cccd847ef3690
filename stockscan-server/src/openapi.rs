//! OpenAPI documentation configuration
//!
//! Generates OpenAPI 3.0 specification for the StockScan API.

use stockscan_core::{
    AssetRecord, FlagRequest, FlagResponse, MatchResult, ProviderSummary, ProvidersResponse,
    SafeListResponse, ScanRequest, ScanResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{HealthResponse, ReadyResponse};

/// StockScan API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StockScan API",
        version = "0.1.0",
        description = r#"
## Stock-Provider Attribution for Media Libraries

StockScan finds media whose filename, title, alt text or description follows
the naming conventions of a known stock-photo provider (Getty Images,
Shutterstock, Adobe Stock and about fifty others).

### How It Works

1. **Scan** the library in fixed-size batches via `POST /api/v1/scan`,
   advancing `offset` by `batchSize` while `hasMore` is true
2. Each asset comes back with the matching provider, or `null`
3. **Flag** reviewed assets as safe via `POST /api/v1/flags`
4. Flagged assets drop out of later scans and are listed by `GET /api/v1/safe`

Every `/api/v1` route requires a bearer token carrying the `manage_media`
capability.
"#,
        license(
            name = "MIT OR Apache-2.0",
            url = "https://github.com/stockscan/stockscan/blob/main/LICENSE"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Scanning", description = "Batch scanning and provider attribution"),
        (name = "Safe flags", description = "Operator review decisions"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    modifiers(&SecurityAddon),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::scan::scan_handler,
        crate::handlers::flags::flag_handler,
        crate::handlers::flags::safe_list_handler,
        crate::handlers::providers::providers_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            AssetRecord,
            MatchResult,
            ScanRequest,
            ScanResponse,
            FlagRequest,
            FlagResponse,
            SafeListResponse,
            ProviderSummary,
            ProvidersResponse,
        )
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme referenced by the admin routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
