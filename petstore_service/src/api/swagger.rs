use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api::health;
use pet_records::inbound::axum_router::{
    self as records, OwnerRequest, OwnerResponse, PetRequest, PetResponse,
};
use petstore_auth::inbound::axum_router::{
    self as auth, AccessTokenResponse, LoginRequest, RegisterRequest,
};
use petstore_error_response::{ErrorResponse, ValidationErrorResponse};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
        modifiers(&SecurityAddon),
        paths(
                /// /health
                health::health_handler,

                // auth
                auth::register_handler,
                auth::login_handler,

                // mascotas
                records::list_pets_handler,
                records::get_pet_handler,
                records::create_pet_handler,
                records::update_pet_handler,
                records::delete_pet_handler,

                // duenios
                records::list_owners_handler,
                records::get_owner_handler,
                records::create_owner_handler,
                records::update_owner_handler,
                records::delete_owner_handler,
        ),
        components(
            schemas(
                        ErrorResponse,
                        ValidationErrorResponse,
                        RegisterRequest, LoginRequest, AccessTokenResponse,
                        PetRequest, PetResponse,
                        OwnerRequest, OwnerResponse,
            ),
        ),
        tags(
            (name = "petstore service", description = "Pet grooming records"),
            (name = "auth", description = "Registration and login"),
            (name = "mascotas", description = "Pets and their owners"),
            (name = "duenios", description = "Owners"),
        )
    )]
pub struct ApiDoc;
