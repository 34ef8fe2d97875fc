//! Countries API handlers.
//!
//! ```text
//! GET    /api/countries?pageNumber=&pageSize=&search=
//! GET    /api/countries/{id}
//! POST   /api/countries            {"name":"Wonderland","code":"WL"}
//! PUT    /api/countries/{id}       {"name":"Wonderland","code":"WL"}
//! DELETE /api/countries/{id}
//! ```
//!
//! Each handler follows the same shape: validate input, call the repository,
//! map the outcome to the [`ApiResponse`] envelope and a status code. No
//! repository failure escapes as an unhandled actix error; anything
//! unexpected becomes a generic 500 with the detail kept server-side.

use actix_web::{HttpResponse, delete, get, http::header, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{DEFAULT_PAGE_SIZE, PageRequest, PageRequestError, PagedResult};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{Country, CountryDraft, RepositoryError};
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::state::HttpState;

/// Wire representation of a country record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryDto {
    pub id: i32,
    pub name: String,
    pub code: String,
    /// ISO-8601 creation timestamp (UTC).
    pub created_date: DateTime<Utc>,
}

impl From<Country> for CountryDto {
    fn from(country: Country) -> Self {
        Self {
            id: country.id,
            name: country.name,
            code: country.code,
            created_date: country.created_date,
        }
    }
}

/// Paged envelope for list responses, with the derived page arithmetic
/// flattened onto the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedResultDto<T> {
    pub data: Vec<T>,
    pub total_records: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> From<PagedResult<T>> for PagedResultDto<T> {
    fn from(page: PagedResult<T>) -> Self {
        let total_pages = page.total_pages();
        let has_previous_page = page.has_previous_page();
        let has_next_page = page.has_next_page();
        Self {
            data: page.data,
            total_records: page.total_records,
            page_number: page.page_number,
            page_size: page.page_size,
            total_pages,
            has_previous_page,
            has_next_page,
        }
    }
}

/// Create/update request body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryBody {
    pub name: String,
    pub code: String,
}

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListCountriesQuery {
    /// 1-based page number (default 1).
    pub page_number: Option<i64>,
    /// Rows per page, between 1 and 100 (default 10).
    pub page_size: Option<i64>,
    /// Case-insensitive substring filter over name and code.
    pub search: Option<String>,
}

/// Validate the paging parameters, applying the documented defaults.
fn page_request(query: &ListCountriesQuery) -> Result<PageRequest, PageRequestError> {
    let number = query.page_number.unwrap_or(1);
    let size = query.page_size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE));
    let number = u32::try_from(number).map_err(|_| {
        // Negative numbers and overflow both fail the conversion; only the
        // former is a "greater than 0" problem.
        if number > 0 {
            PageRequestError::PageNumberTooLarge
        } else {
            PageRequestError::PageNumberOutOfRange
        }
    })?;
    let size = u32::try_from(size).map_err(|_| PageRequestError::PageSizeOutOfRange)?;
    PageRequest::new(number, size)
}

/// Which uniqueness check a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DuplicateField {
    Name,
    Code,
}

/// Wording variant for duplicate errors; create and update phrase the
/// detail line differently.
#[derive(Debug, Clone, Copy)]
enum DuplicateWording {
    Create,
    Update,
}

fn duplicate_field(err: &RepositoryError) -> Option<DuplicateField> {
    match err {
        RepositoryError::DuplicateName => Some(DuplicateField::Name),
        RepositoryError::DuplicateCode => Some(DuplicateField::Code),
        _ => None,
    }
}

fn duplicate_response<T: Serialize>(
    field: DuplicateField,
    draft: &CountryDraft,
    wording: DuplicateWording,
) -> HttpResponse {
    let (message, detail) = match (field, wording) {
        (DuplicateField::Name, DuplicateWording::Create) => (
            "Country name already exists",
            "Please use a different country name".to_owned(),
        ),
        (DuplicateField::Name, DuplicateWording::Update) => (
            "Country name already exists",
            format!("A country with the name '{}' already exists", draft.name()),
        ),
        (DuplicateField::Code, DuplicateWording::Create) => (
            "Country code already exists",
            "Please use a different country code".to_owned(),
        ),
        (DuplicateField::Code, DuplicateWording::Update) => (
            "Country code already exists",
            format!("A country with the code '{}' already exists", draft.code()),
        ),
    };
    HttpResponse::BadRequest().json(ApiResponse::<T>::failure(message, vec![detail]))
}

/// Run the name-then-code uniqueness pre-checks.
///
/// Name failures win: the code check only runs once the name passes, so a
/// response never reports both collisions at once. The store's unique
/// indexes remain the authority when two writers race past these checks.
async fn find_duplicate(
    state: &HttpState,
    draft: &CountryDraft,
    exclude_id: Option<i32>,
) -> Result<Option<DuplicateField>, RepositoryError> {
    if state
        .countries
        .exists_by_name(draft.name(), exclude_id)
        .await?
    {
        return Ok(Some(DuplicateField::Name));
    }
    if state
        .countries
        .exists_by_code(draft.code(), exclude_id)
        .await?
    {
        return Ok(Some(DuplicateField::Code));
    }
    Ok(None)
}

/// Map an unexpected repository failure to the uniform 500 envelope.
///
/// The detail is logged server-side only; clients always receive the same
/// generic message regardless of the operation that failed.
fn internal_error<T: Serialize>(
    operation: &'static str,
    err: &RepositoryError,
    message: &str,
) -> HttpResponse {
    error!(error = %err, operation, "repository failure");
    HttpResponse::InternalServerError().json(ApiResponse::<T>::failure(
        message,
        vec!["Internal server error".to_owned()],
    ))
}

fn invalid_id_response<T: Serialize>() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<T>::failure(
        "Invalid country ID",
        vec!["Country ID must be greater than 0".to_owned()],
    ))
}

fn not_found_response<T: Serialize>(id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<T>::failure(
        "Country not found",
        vec![format!("Country with ID {id} was not found")],
    ))
}

fn validation_failure_response<T: Serialize>(
    errors: &[crate::domain::CountryValidationError],
) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<T>::failure(
        "Validation failed",
        errors.iter().map(ToString::to_string).collect(),
    ))
}

/// List countries with pagination and optional search.
#[utoipa::path(
    get,
    path = "/api/countries",
    params(ListCountriesQuery),
    responses(
        (status = 200, description = "Countries retrieved", body = ApiResponse<PagedResultDto<CountryDto>>),
        (status = 400, description = "Invalid paging parameters", body = ApiResponse<PagedResultDto<CountryDto>>),
        (status = 500, description = "Internal server error", body = ApiResponse<PagedResultDto<CountryDto>>)
    ),
    tag = "countries",
    operation_id = "listCountries"
)]
#[get("")]
pub async fn list_countries(
    state: web::Data<HttpState>,
    query: web::Query<ListCountriesQuery>,
) -> HttpResponse {
    let query = query.into_inner();
    let page = match page_request(&query) {
        Ok(page) => page,
        Err(err) => {
            return HttpResponse::BadRequest().json(
                ApiResponse::<PagedResultDto<CountryDto>>::failure(
                    "Validation failed",
                    vec![err.to_string()],
                ),
            );
        }
    };
    let search = query.search.as_deref().filter(|term| !term.trim().is_empty());

    match state.countries.get_all(page, search).await {
        Ok(result) => {
            let dto = PagedResultDto::from(result.map(CountryDto::from));
            HttpResponse::Ok().json(ApiResponse::ok("Countries retrieved successfully", dto))
        }
        Err(err) => internal_error::<PagedResultDto<CountryDto>>(
            "list countries",
            &err,
            "An error occurred while retrieving countries",
        ),
    }
}

/// Get a specific country by id.
#[utoipa::path(
    get,
    path = "/api/countries/{id}",
    params(("id" = i32, Path, description = "Country id")),
    responses(
        (status = 200, description = "Country retrieved", body = ApiResponse<CountryDto>),
        (status = 400, description = "Invalid id", body = ApiResponse<CountryDto>),
        (status = 404, description = "Country not found", body = ApiResponse<CountryDto>),
        (status = 500, description = "Internal server error", body = ApiResponse<CountryDto>)
    ),
    tag = "countries",
    operation_id = "getCountry"
)]
#[get("/{id}")]
pub async fn get_country(state: web::Data<HttpState>, path: web::Path<i32>) -> HttpResponse {
    let id = path.into_inner();
    if id <= 0 {
        return invalid_id_response::<CountryDto>();
    }

    match state.countries.get_by_id(id).await {
        Ok(Some(country)) => HttpResponse::Ok().json(ApiResponse::ok(
            "Country retrieved successfully",
            CountryDto::from(country),
        )),
        Ok(None) => not_found_response::<CountryDto>(id),
        Err(err) => internal_error::<CountryDto>(
            "get country",
            &err,
            "An error occurred while retrieving the country",
        ),
    }
}

/// Create a new country.
#[utoipa::path(
    post,
    path = "/api/countries",
    request_body = CountryBody,
    responses(
        (status = 201, description = "Country created", body = ApiResponse<CountryDto>,
            headers(("Location" = String, description = "Path of the created resource"))),
        (status = 400, description = "Validation failure or duplicate name/code", body = ApiResponse<CountryDto>),
        (status = 500, description = "Internal server error", body = ApiResponse<CountryDto>)
    ),
    tag = "countries",
    operation_id = "createCountry"
)]
#[post("")]
pub async fn create_country(
    state: web::Data<HttpState>,
    payload: web::Json<CountryBody>,
) -> HttpResponse {
    let draft = match CountryDraft::new(&payload.name, &payload.code) {
        Ok(draft) => draft,
        Err(errors) => return validation_failure_response::<CountryDto>(&errors),
    };

    match find_duplicate(&state, &draft, None).await {
        Ok(Some(field)) => {
            return duplicate_response::<CountryDto>(field, &draft, DuplicateWording::Create);
        }
        Ok(None) => {}
        Err(err) => {
            return internal_error::<CountryDto>(
                "create country",
                &err,
                "An error occurred while creating the country",
            );
        }
    }

    match state.countries.add(&draft).await {
        Ok(country) => {
            let location = format!("/api/countries/{}", country.id);
            HttpResponse::Created()
                .insert_header((header::LOCATION, location))
                .json(ApiResponse::ok(
                    "Country created successfully",
                    CountryDto::from(country),
                ))
        }
        // Pre-check raced another writer; the store's constraint is the
        // authoritative duplicate signal.
        Err(err) => match duplicate_field(&err) {
            Some(field) => duplicate_response::<CountryDto>(field, &draft, DuplicateWording::Create),
            None => internal_error::<CountryDto>(
                "create country",
                &err,
                "An error occurred while creating the country",
            ),
        },
    }
}

/// Update an existing country's name and code.
#[utoipa::path(
    put,
    path = "/api/countries/{id}",
    params(("id" = i32, Path, description = "Country id")),
    request_body = CountryBody,
    responses(
        (status = 200, description = "Country updated", body = ApiResponse<CountryDto>),
        (status = 400, description = "Invalid id, validation failure, or duplicate", body = ApiResponse<CountryDto>),
        (status = 404, description = "Country not found", body = ApiResponse<CountryDto>),
        (status = 500, description = "Internal server error", body = ApiResponse<CountryDto>)
    ),
    tag = "countries",
    operation_id = "updateCountry"
)]
#[put("/{id}")]
pub async fn update_country(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<CountryBody>,
) -> HttpResponse {
    let id = path.into_inner();
    if id <= 0 {
        return invalid_id_response::<CountryDto>();
    }
    let draft = match CountryDraft::new(&payload.name, &payload.code) {
        Ok(draft) => draft,
        Err(errors) => return validation_failure_response::<CountryDto>(&errors),
    };

    match state.countries.get_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found_response::<CountryDto>(id),
        Err(err) => {
            return internal_error::<CountryDto>(
                "update country",
                &err,
                "An error occurred while updating the country",
            );
        }
    }

    match find_duplicate(&state, &draft, Some(id)).await {
        Ok(Some(field)) => {
            return duplicate_response::<CountryDto>(field, &draft, DuplicateWording::Update);
        }
        Ok(None) => {}
        Err(err) => {
            return internal_error::<CountryDto>(
                "update country",
                &err,
                "An error occurred while updating the country",
            );
        }
    }

    match state.countries.update(id, &draft).await {
        Ok(country) => HttpResponse::Ok().json(ApiResponse::ok(
            "Country updated successfully",
            CountryDto::from(country),
        )),
        // Row vanished between the existence check and the write.
        Err(RepositoryError::NotFound) => not_found_response::<CountryDto>(id),
        Err(err) => match duplicate_field(&err) {
            Some(field) => duplicate_response::<CountryDto>(field, &draft, DuplicateWording::Update),
            None => internal_error::<CountryDto>(
                "update country",
                &err,
                "An error occurred while updating the country",
            ),
        },
    }
}

/// Soft-delete a country.
#[utoipa::path(
    delete,
    path = "/api/countries/{id}",
    params(("id" = i32, Path, description = "Country id")),
    responses(
        (status = 200, description = "Country deleted"),
        (status = 400, description = "Invalid id or country already deleted"),
        (status = 404, description = "Country not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "countries",
    operation_id = "deleteCountry"
)]
#[delete("/{id}")]
pub async fn delete_country(state: web::Data<HttpState>, path: web::Path<i32>) -> HttpResponse {
    let id = path.into_inner();
    if id <= 0 {
        return invalid_id_response::<serde_json::Value>();
    }

    match state.countries.soft_delete(id).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::<serde_json::Value>::ok_empty(
            "Country deleted successfully",
        )),
        Err(RepositoryError::NotFound) => not_found_response::<serde_json::Value>(id),
        // Distinct from 404: the row exists but its flag is already set.
        Err(RepositoryError::AlreadyDeleted) => {
            HttpResponse::BadRequest().json(ApiResponse::<serde_json::Value>::failure(
                "Country is already deleted",
                vec![format!("Country with ID {id} is already deleted")],
            ))
        }
        Err(err) => internal_error::<serde_json::Value>(
            "delete country",
            &err,
            "An error occurred while deleting the country",
        ),
    }
}
