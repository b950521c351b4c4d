use tracing::{debug, error, info};

use archive_twitter_data::{
    build_records, parse_export_file, write_records, LikeCountIndex, LikeEnvelope,
    RecordFileError, TweetEnvelope, TweetTable, LIKE_PREFIX, TWEETS_PREFIX,
};

use crate::context::PipelineContext;
use crate::error::ExportError;
use crate::steps::discover::DataFiles;

/// Parse les deux sources, joint les likes aux tweets et écrit le premier
/// CSV. Une source au contenu invalide est traitée comme vide, l'erreur
/// est journalisée ; seul un échec d'entrée/sortie est fatal.
pub async fn run_export(
    context: &PipelineContext,
    files: &DataFiles,
) -> Result<usize, ExportError> {
    debug!(
        "Export depuis {} et {}",
        files.tweets_file.display(),
        files.likes_file.display()
    );

    let tweets: Vec<TweetEnvelope> =
        parse_or_empty(parse_export_file(&files.tweets_file, TWEETS_PREFIX))?;
    let likes: Vec<LikeEnvelope> =
        parse_or_empty(parse_export_file(&files.likes_file, LIKE_PREFIX))?;

    let table = TweetTable::from_envelopes(tweets);
    info!("{} tweets chargés", table.len());
    let index = LikeCountIndex::from_envelopes(&likes);
    info!("{} likes traités", likes.len());

    let records = build_records(&table, &index);
    write_records(&context.csv_path, &records)?;

    info!("Données extraites vers {}", context.csv_path.display());
    Ok(records.len())
}

fn parse_or_empty<T>(result: Result<Vec<T>, RecordFileError>) -> Result<Vec<T>, ExportError> {
    match result {
        Ok(records) => Ok(records),
        Err(e @ RecordFileError::Malformed { .. }) => {
            error!("{}", e);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}
