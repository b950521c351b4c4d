use std::{fs, path::PathBuf};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use archive_image_analysis::{ClipClient, ImageClassifier};
use archive_pipeline::PipelineContext;

#[derive(Debug, Parser)]
/// Traitement d'une archive Twitter :
///
/// dézippage, export CSV, analyse d'images optionnelle
#[clap(name = "archiviste", about)]
struct Cli {
  /// Chemin de l'archive zip à traiter
  #[clap(long, env, default_value = "twitter-archive.zip")]
  archive: PathBuf,
  /// Classe la première image de chaque tweet avec le modèle CLIP
  #[clap(long)]
  analyze_images: bool,
  /// Dossier de sortie des CSV
  #[clap(long, env, default_value = "output")]
  output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  Registry::default()
    .with(tracing_subscriber::fmt::layer())
    .with(EnvFilter::from_default_env())
    .init();
  let args = Cli::parse();

  fs::create_dir_all(&args.output_dir)?;
  let context = PipelineContext::new(args.archive, args.output_dir);

  // la capacité de classification est construite ici puis passée au
  // pipeline ; indisponible, la passe d'enrichissement sera sautée
  let classifier: Option<ClipClient> = if args.analyze_images {
    match ClipClient::load().await {
      Ok(client) => Some(client),
      Err(e) => {
        tracing::error!("Analyse demandée mais modèle indisponible: {}", e);
        None
      }
    }
  } else {
    None
  };

  tokio::select! {
    _ = tokio::signal::ctrl_c() => {
      tracing::warn!("Interruption, abandon du traitement");
      std::process::exit(1);
    }
    result = archive_pipeline::run(
      &context,
      classifier.as_ref().map(|c| c as &dyn ImageClassifier),
    ) => result?,
  }

  Ok(())
}
