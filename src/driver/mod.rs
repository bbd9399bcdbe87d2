mod options;

use itertools::Itertools;
pub use options::DriverOptions;

use crate::prelude::*;

/// Sanity bound on pieces per game; a competent agent on a 14-wide field
/// would otherwise play close to forever.
pub const MAX_PIECES: u32 = 5000;

/// NES-style per-clear rewards, indexed by rows cleared at once.
pub const LINE_REWARDS: [u64; 5] = [0, 40, 100, 300, 1200];

#[derive(Clone, Copy, Debug, Default)]
pub struct GameReport {
    pub pieces: u32,
    pub lines: u64,
    pub level: u64,
    pub score: u64,
    pub topped_out: bool,
}

/// Plays the configured number of AI games and logs per-game and aggregate
/// results. The agent, with its caches and scratch grids, is reused across
/// games.
pub fn run_games(shapes: &ShapeTable, options: &DriverOptions) -> Result<()> {
    let weights = options.parse_weights()?;
    let mut agent = Agent::new(weights);

    let mut best: Option<GameReport> = None;
    let mut total_lines = 0u64;
    let mut scores: Vec<u64> = Vec::with_capacity(options.games as usize);

    for game in 0..options.games {
        let seed = options.seed.map(|s| s.wrapping_add(game as u64));
        let report = play_game(shapes, &mut agent, seed, options.max_pieces)?;
        log::info!(
            "game {game}: {} pieces, {} lines, level {}, score {}{}",
            report.pieces,
            report.lines,
            report.level,
            report.score,
            if report.topped_out { "" } else { " (piece budget reached)" }
        );

        total_lines += report.lines;
        scores.push(report.score);
        if best.is_none_or(|b| report.score > b.score) {
            best = Some(report);
        }
    }

    if options.games > 1 {
        log::info!(
            "{} games: mean score {:.1}, mean lines {:.1}, best score {}",
            options.games,
            scores.iter().sum::<u64>() as f64 / options.games as f64,
            total_lines as f64 / options.games as f64,
            best.map_or(0, |b| b.score)
        );
        log::debug!("scores: [{}]", scores.iter().join(", "));
    }
    let (hits, lookups) = agent.cache_stats();
    log::debug!("evaluation cache: {hits}/{lookups} hits");
    Ok(())
}

/// Runs one game to top-out or the piece budget: pop a shape, spawn it, ask
/// the agent for a placement, walk the block there through the guarded
/// moves, hard-drop, and bank any cleared lines.
pub fn play_game(
    shapes: &ShapeTable,
    agent: &mut Agent,
    seed: Option<u64>,
    max_pieces: u32,
) -> Result<GameReport> {
    let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT)
        .ok_or_else(|| anyhow!("invalid playfield dimensions {GRID_WIDTH}x{GRID_HEIGHT}"))?;
    let mut stream = ShapeStream::new(shapes, seed);
    let mut report = GameReport::default();

    while report.pieces < max_pieces {
        // decide while the piece is still previewed at slot 0, so the
        // search's lookahead starts at slot 1; commit the pop afterwards
        let Some(shape) = stream.peek(0) else {
            break;
        };
        let mut block = Block::new(shape);
        if grid.spawn(&mut block) == SpawnOutcome::GameOver {
            report.topped_out = true;
            break;
        }

        // no placement means the stack has met the spawn zone; drop in
        // place and let the next spawn call it
        let decision = agent.find_best(&mut grid, &block, &mut stream);
        stream.pop();
        if let Some(mv) = decision {
            grid.rotate(&mut block, mv.rot as i32);
            let dx = mv.col - block.offset.x;
            if dx != 0 {
                let dir = if dx < 0 { Direction::Left } else { Direction::Right };
                grid.shift(&mut block, dir, dx.abs());
            }
        }
        grid.drop(&mut block);

        let (_, cleared) = grid.apply(&block);
        if cleared > 0 {
            report.lines += cleared as u64;
            report.level = report.lines / 10;
            report.score += LINE_REWARDS[cleared as usize] * (report.level + 1);
            log::debug!(
                "cleared {cleared} rows, {} total, level {}",
                report.lines,
                report.level
            );
        }
        if let Some(col) = grid.tetris_ready_col() {
            log::trace!("tetris well open in column {col}");
        }
        report.pieces += 1;
    }

    Ok(report)
}
