use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};

use vitrine::auth::AuthConfig;
use vitrine::db::establish_connection_pool;
use vitrine::models::config::ServerConfig;
use vitrine::repository::DieselRepository;
use vitrine::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database pool: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);
    let auth_config: AuthConfig = config.auth_config();

    let bind_address = config.bind_address.clone();
    log::info!("Starting vitrine on {bind_address}");

    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(auth_config.clone()))
            .service(
                web::scope("/api")
                    .service(routes::auth::issue_tokens)
                    .service(routes::auth::refresh_token)
                    .service(routes::docs::api_schema)
                    .service(routes::docs::api_docs)
                    .service(
                        web::scope("/v1")
                            .service(routes::auth::register)
                            .service(routes::categories::list_categories)
                            .service(routes::categories::get_category)
                            .service(routes::categories::create_category)
                            .service(routes::categories::update_category)
                            .service(routes::categories::patch_category)
                            .service(routes::categories::delete_category)
                            .service(routes::products::list_products)
                            .service(routes::products::get_product)
                            .service(routes::products::create_product)
                            .service(routes::products::update_product)
                            .service(routes::products::patch_product)
                            .service(routes::products::delete_product)
                            .service(routes::customers::list_customers)
                            .service(routes::customers::get_customer)
                            .service(routes::customers::create_customer)
                            .service(routes::customers::update_customer)
                            .service(routes::customers::patch_customer)
                            .service(routes::customers::delete_customer)
                            .service(routes::carts::list_carts)
                            .service(routes::carts::get_cart)
                            .service(routes::carts::create_cart)
                            .service(routes::carts::update_cart)
                            .service(routes::carts::delete_cart)
                            .service(routes::cart_items::list_cart_items)
                            .service(routes::cart_items::get_cart_item)
                            .service(routes::cart_items::add_cart_item)
                            .service(routes::cart_items::update_cart_item)
                            .service(routes::cart_items::patch_cart_item)
                            .service(routes::cart_items::delete_cart_item)
                            .service(routes::payments::list_payments)
                            .service(routes::payments::get_payment)
                            .service(routes::payments::create_payment)
                            .service(routes::payments::update_payment)
                            .service(routes::payments::patch_payment)
                            .service(routes::payments::delete_payment),
                    ),
            );
        if config.serve_media {
            app = app.service(actix_files::Files::new(&config.media_url, &config.media_root));
        }
        app
    })
    .bind(&bind_address)?
    .run()
    .await
}
