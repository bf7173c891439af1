//! Benchmarks for the CellMsg → update → Cmd loop
//!
//! Run with: cargo bench dispatch

use gridedit::cell::{CellAddress, CellKind};
use gridedit::config::GridEditConfig;
use gridedit::grid::{GridContext, SelectionToggle};
use gridedit::messages::{CellMsg, EditKey, InputMsg};
use gridedit::model::EditCellController;
use gridedit::render::HtmlRenderer;
use gridedit::runtime::{App, ManualScheduler};
use gridedit::sheet::{CsvGrid, SheetLayout, Step};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn make_grid(rows: usize) -> CsvGrid {
    let headers = vec!["id".to_string(), "name".to_string()];
    let data = (0..rows)
        .map(|i| vec![i.to_string(), format!("name {}", i)])
        .collect();
    CsvGrid::new(headers, data)
}

// ============================================================================
// Update-only benchmarks
// ============================================================================

#[divan::bench(args = [100, 1000])]
fn double_click_then_blur(iterations: usize) {
    let mut grid = make_grid(1000);
    let layout = grid.layout();
    let mut renderer = HtmlRenderer::default();
    let mut focus = SelectionToggle::default();
    let mut controller = EditCellController::convertible();

    for i in 0..iterations {
        let target = SheetLayout::element_id(&CellAddress::new(i % 1000, "name"));
        let mut ctx = GridContext::new(&mut grid, &layout, &mut renderer, &mut focus);
        for msg in [
            CellMsg::Click {
                target: target.clone(),
            },
            CellMsg::Click { target },
            CellMsg::Blur,
        ] {
            divan::black_box(controller.update(&mut ctx, msg).ok());
        }
    }
}

#[divan::bench(args = [100, 1000])]
fn typing_into_input(chars: usize) {
    let mut grid = make_grid(10);
    let layout = grid.layout();
    let mut renderer = HtmlRenderer::default();
    let mut focus = SelectionToggle::default();
    let mut controller = EditCellController::text();

    let mut ctx = GridContext::new(&mut grid, &layout, &mut renderer, &mut focus);
    let _ = controller.start_edit(&mut ctx, &CellAddress::new(0usize, "name"));
    let _ = controller.update(&mut ctx, CellMsg::KeyDown(EditKey::End));

    for i in 0..chars {
        let ch = (b'a' + (i % 26) as u8) as char;
        let cmd = controller.update(&mut ctx, CellMsg::Input(InputMsg::InsertChar(ch)));
        divan::black_box(cmd.ok());
    }
}

#[divan::bench(args = [10, 100])]
fn stale_timer_storm(clicks: usize) {
    let mut grid = make_grid(clicks);
    let layout = grid.layout();
    let mut renderer = HtmlRenderer::default();
    let mut focus = SelectionToggle::default();
    let mut controller = EditCellController::convertible();

    let mut ctx = GridContext::new(&mut grid, &layout, &mut renderer, &mut focus);
    for row in 0..clicks {
        let target = SheetLayout::element_id(&CellAddress::new(row, "name"));
        let _ = controller.update(&mut ctx, CellMsg::Click { target });
    }
    for generation in 1..=clicks as u64 {
        let cmd = controller.update(&mut ctx, CellMsg::ClickTimerExpired { generation });
        divan::black_box(cmd.ok());
    }
}

// ============================================================================
// Replay benchmarks
// ============================================================================

#[divan::bench(args = [10, 100])]
fn replay_edit_sessions(sessions: usize) {
    let grid = make_grid(sessions);
    let mut app = App::new(
        grid,
        CellKind::convertible(),
        &GridEditConfig::default(),
        ManualScheduler::new(),
    );

    let steps: Vec<Step> = (0..sessions)
        .flat_map(|row| {
            let cell = gridedit::sheet::CellRef {
                row,
                column: "name".to_string(),
            };
            [
                Step::FocusIn(cell),
                Step::Type("edited".to_string()),
                Step::Key(EditKey::Enter),
            ]
        })
        .collect();

    divan::black_box(app.replay(&steps));
}
