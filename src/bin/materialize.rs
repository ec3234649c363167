//! Materialize Binary
//!
//! Loads `x,y` points into a `points_tmp` temporary table, reads them back
//! through the query handle, and rolls the transaction back.
//!
//! Options: --url, --filter

use clap::Parser;
use std::sync::Arc;
use temptable::*;
use tokio_postgres::Row;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, help = "Connection string, falls back to DB_URL")]
    url: Option<String>,
    #[arg(long, help = "Predicate applied to the temporary table")]
    filter: Option<String>,
    #[arg(help = "Points as x,y; leave y empty for null")]
    points: Vec<Point>,
}

#[derive(Debug, Clone)]
struct Point {
    x: i32,
    y: Option<i32>,
}

impl std::str::FromStr for Point {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("broken delimiter"))?;
        let x = x.trim().parse::<i32>()?;
        let y = match y.trim() {
            "" => None,
            y => Some(y.parse::<i32>()?),
        };
        Ok(Self { x, y })
    }
}

impl Entity for Point {
    fn name() -> &'static str {
        "points_tmp"
    }
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::required("x", "integer", Type::INT4),
            Column::optional("y", "integer", Type::INT4),
        ];
        COLUMNS
    }
    fn get(&self, column: &str) -> Option<&(dyn ToSql + Sync)> {
        match column {
            "x" => Some(&self.x),
            "y" => Some(&self.y),
            _ => None,
        }
    }
}

impl TemporaryTable for Point {}

impl Hydrate for Point {
    fn hydrate(row: &Row) -> Result<Self, PgErr> {
        Ok(Self {
            x: row.try_get("x")?,
            y: row.try_get("y")?,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log();
    let args = Args::parse();
    let mut client = match args.url {
        Some(ref url) => connect(url).await?,
        None => db().await?,
    };
    let mut builder = ModelBuilder::new();
    builder.add_temporary_tables(&[Module::new("points").temporary::<Point>()]);
    let model = Arc::new(builder.build());

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, cancelling import");
            interrupt.cancel();
        }
    });

    let tx = client.transaction().await?;
    {
        let context = Context::new(&tx, model);
        let mut query = context.materialize(args.points, &token).await?;
        if let Some(predicate) = args.filter {
            query = query.filter(predicate);
        }
        let query = query.order_by("x");
        log::info!("{}", query.sql());
        for point in query.load(&[]).await? {
            match point.y {
                Some(y) => println!("{}\t{}", point.x, y),
                None => println!("{}\t", point.x),
            }
        }
    }
    tx.rollback().await?;
    Ok(())
}
