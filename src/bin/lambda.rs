use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::info;

use shortcoder::config::{get_config, init_config};
use shortcoder::lambda::{InvocationEvent, handler};
use shortcoder::system::init_logging;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    init_config();

    let config = get_config();
    let _guard = init_logging(&config.logging);
    info!(
        "Starting invocation handler (table: {}, storage: {})",
        config.service.db_table_name, config.storage.backend
    );

    lambda_runtime::run(service_fn(|event: LambdaEvent<InvocationEvent>| async move {
        Ok::<_, Error>(handler(event.payload).await)
    }))
    .await
}
