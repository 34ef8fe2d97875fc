//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API: the five
//! country endpoints, the health probe, and the envelope/DTO schemas. The
//! generated document backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::countries::{CountryBody, CountryDto, PagedResultDto};
use crate::inbound::http::envelope::ApiResponse;

/// OpenAPI document for the countries API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Countries API",
        description = "Paginated CRUD over country records with soft delete."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::countries::list_countries,
        crate::inbound::http::countries::get_country,
        crate::inbound::http::countries::create_country,
        crate::inbound::http::countries::update_country,
        crate::inbound::http::countries::delete_country,
        crate::inbound::http::health::healthz,
    ),
    components(schemas(
        CountryDto,
        CountryBody,
        PagedResultDto<CountryDto>,
        ApiResponse<CountryDto>,
        ApiResponse<PagedResultDto<CountryDto>>,
    )),
    tags(
        (name = "countries", description = "Country CRUD operations"),
        (name = "health", description = "Service probes"),
    )
)]
pub struct ApiDoc;
