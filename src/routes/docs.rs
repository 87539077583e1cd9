use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Responder, get};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::dto::carts::{CartDto, CartItemDto};
use crate::dto::categories::CategoryDto;
use crate::dto::customers::CustomerDto;
use crate::dto::payments::PaymentDto;
use crate::dto::products::ProductDto;
use crate::dto::users::{AccessTokenDto, RegisteredUserDto, TokenPairDto, UserSummaryDto};
use crate::forms::auth::{RefreshForm, RegisterForm, TokenForm};
use crate::forms::carts::{CartForm, CartItemForm, CartItemQuantityForm};
use crate::forms::categories::{CategoryForm, CategoryPatchForm};
use crate::forms::customers::CustomerForm;
use crate::forms::payments::{PaymentForm, PaymentPatchForm};
use crate::forms::products::{ProductForm, ProductPatchForm};

/// Machine-readable description of the whole API surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::categories::list_categories,
        crate::routes::categories::get_category,
        crate::routes::categories::create_category,
        crate::routes::categories::update_category,
        crate::routes::categories::patch_category,
        crate::routes::categories::delete_category,
        crate::routes::products::list_products,
        crate::routes::products::get_product,
        crate::routes::products::create_product,
        crate::routes::products::update_product,
        crate::routes::products::patch_product,
        crate::routes::products::delete_product,
        crate::routes::customers::list_customers,
        crate::routes::customers::get_customer,
        crate::routes::customers::create_customer,
        crate::routes::customers::update_customer,
        crate::routes::customers::patch_customer,
        crate::routes::customers::delete_customer,
        crate::routes::carts::list_carts,
        crate::routes::carts::get_cart,
        crate::routes::carts::create_cart,
        crate::routes::carts::update_cart,
        crate::routes::carts::delete_cart,
        crate::routes::cart_items::list_cart_items,
        crate::routes::cart_items::get_cart_item,
        crate::routes::cart_items::add_cart_item,
        crate::routes::cart_items::update_cart_item,
        crate::routes::cart_items::patch_cart_item,
        crate::routes::cart_items::delete_cart_item,
        crate::routes::payments::list_payments,
        crate::routes::payments::get_payment,
        crate::routes::payments::create_payment,
        crate::routes::payments::update_payment,
        crate::routes::payments::patch_payment,
        crate::routes::payments::delete_payment,
        crate::routes::auth::register,
        crate::routes::auth::issue_tokens,
        crate::routes::auth::refresh_token,
    ),
    components(schemas(
        CategoryDto,
        ProductDto,
        CustomerDto,
        CartDto,
        CartItemDto,
        PaymentDto,
        RegisteredUserDto,
        UserSummaryDto,
        TokenPairDto,
        AccessTokenDto,
        CategoryForm,
        CategoryPatchForm,
        ProductForm,
        ProductPatchForm,
        CustomerForm,
        CartForm,
        CartItemForm,
        CartItemQuantityForm,
        PaymentForm,
        PaymentPatchForm,
        RegisterForm,
        TokenForm,
        RefreshForm,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "categories", description = "Catalog categories"),
        (name = "products", description = "Catalog products"),
        (name = "customers", description = "Customer profiles"),
        (name = "carts", description = "Shopping carts"),
        (name = "cart items", description = "Cart line items"),
        (name = "payments", description = "Payment records"),
        (name = "auth", description = "Registration and token endpoints"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

// Swagger UI assets come from a CDN so nothing has to be bundled or fetched
// at build time.
const DOCS_PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Vitrine API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      SwaggerUIBundle({ url: "/api/schema", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

#[get("/schema")]
pub async fn api_schema() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[get("/docs")]
pub async fn api_docs() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(DOCS_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/v1/categories",
            "/api/v1/products",
            "/api/v1/customers",
            "/api/v1/carts",
            "/api/v1/cart-items",
            "/api/v1/payments",
            "/api/v1/register",
            "/api/token",
            "/api/token/refresh",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }
}
