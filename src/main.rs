mod db;
mod env_config;
mod error;
mod logger;
mod services;

use env_config::models::app_setting::AppSettings;
use error::IngestError;
use services::ingestion::runner::{IngestionReport, IngestionRunner};
use std::process::ExitCode;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Инициализация приложения
    let settings = match initialize_application() {
        Ok(settings) => settings,
        Err(err) => return report_failure(&err),
    };

    // Один прогон загрузки в собственном span
    let run_id = Uuid::new_v4();
    let outcome = run_ingestion(&settings)
        .instrument(info_span!("ingest", %run_id))
        .await;

    // Вывод итоговой строки статуса
    match outcome {
        Ok(report) => {
            info!(
                "Run {} finished: {} coins via {}",
                run_id, report.coin_count, report.server
            );
            println!("{}", report.status_line());
            ExitCode::SUCCESS
        }
        Err(err) => report_failure(&err),
    }
}

/// Загружает `.env`, настройки и логирование
fn initialize_application() -> Result<AppSettings, IngestError> {
    // Отсутствие .env вне локальной разработки допустимо
    dotenv::dotenv().ok();

    // Загрузка переменных окружения и конфигурации
    let settings = AppSettings::load()?;

    // Настройка логирования с уровнем и форматом из конфигурации
    if let Err(err) = logger::init_logger(
        &settings.app_config.log.level,
        &settings.app_config.log.format,
        !settings.app_env.is_local(),
    ) {
        return Err(IngestError::Config(format!(
            "failed to initialize logger: {}",
            err
        )));
    }

    info!("Starting coin market ingestion...");
    info!("Current environment: {}", settings.app_env.env);

    if settings.app_env.is_local() {
        debug!("Configuration details: {:#?}", settings);
    }

    Ok(settings)
}

async fn run_ingestion(settings: &AppSettings) -> Result<IngestionReport, IngestError> {
    // Создание загрузчика и выполнение одного прогона
    let runner = IngestionRunner::new(settings)?;
    runner.run().await
}

/// Печатает строку статуса и сообщает об ошибке планировщику через код выхода
fn report_failure(err: &IngestError) -> ExitCode {
    error!(kind = err.kind(), "Ingestion failed: {}", err);
    println!("{}", err.status_line());
    ExitCode::FAILURE
}
