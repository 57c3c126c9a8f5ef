use std::collections::BTreeMap;
use std::sync::Arc;

use crate::color::ColorScale;
use crate::data::filter::{
    average_price_by_state, state_detail_rows, yearly_average_for_state, StateAverages,
};
use crate::data::model::{Dataset, ElectricityRecord, YearRange};

// ---------------------------------------------------------------------------
// Named inputs, outputs and events
// ---------------------------------------------------------------------------

/// UI controls that produce events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input {
    YearSlider,
    MapClick,
}

/// UI regions that render handler results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Output {
    MapFigure,
    DetailTable,
    TrendPlot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    YearRangeChanged(YearRange),
    /// Carries the postal code of the clicked tile.
    StateClicked(String),
}

impl UiEvent {
    pub fn input(&self) -> Input {
        match self {
            UiEvent::YearRangeChanged(_) => Input::YearSlider,
            UiEvent::StateClicked(_) => Input::MapClick,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection – the input state handed to every handler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub years: YearRange,
    pub clicked_state: Option<String>,
}

impl Selection {
    /// Full year range, nothing clicked.
    pub fn initial(dataset: &Dataset) -> Self {
        Selection {
            years: dataset.full_range(),
            clicked_state: None,
        }
    }

    fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::YearRangeChanged(years) => self.years = years,
            UiEvent::StateClicked(state) => self.clicked_state = Some(state),
        }
    }
}

// ---------------------------------------------------------------------------
// Handler results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MapFigure {
    pub years: YearRange,
    pub averages: StateAverages,
    /// `None` when no state has data in the range.
    pub scale: Option<ColorScale>,
}

/// Detail table state: idle until the first map click.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Idle,
    Showing {
        state: String,
        years: YearRange,
        rows: Vec<ElectricityRecord>,
    },
}

impl TableView {
    pub fn rows(&self) -> &[ElectricityRecord] {
        match self {
            TableView::Idle => &[],
            TableView::Showing { rows, .. } => rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    Map(MapFigure),
    Table(TableView),
    Trend(Vec<(i64, f64)>),
}

pub type Handler = fn(&Dataset, &Selection) -> OutputValue;

pub fn map_handler(dataset: &Dataset, selection: &Selection) -> OutputValue {
    let averages = average_price_by_state(dataset, selection.years);
    let scale = if averages.is_empty() {
        None
    } else {
        averages
            .min()
            .zip(averages.max())
            .map(|(min, max)| ColorScale::new(min, max))
    };
    OutputValue::Map(MapFigure {
        years: selection.years,
        averages,
        scale,
    })
}

pub fn table_handler(dataset: &Dataset, selection: &Selection) -> OutputValue {
    let view = match &selection.clicked_state {
        None => TableView::Idle,
        Some(state) => TableView::Showing {
            state: state.clone(),
            years: selection.years,
            rows: state_detail_rows(dataset, Some(state), selection.years)
                .into_iter()
                .cloned()
                .collect(),
        },
    };
    OutputValue::Table(view)
}

pub fn trend_handler(dataset: &Dataset, selection: &Selection) -> OutputValue {
    let trend = selection
        .clicked_state
        .as_deref()
        .map(|state| yearly_average_for_state(dataset, state, selection.years))
        .unwrap_or_default();
    OutputValue::Trend(trend)
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

struct Binding {
    output: Output,
    inputs: Vec<Input>,
    handler: Handler,
}

static IDLE_TABLE: TableView = TableView::Idle;

/// Routes UI events to the handlers registered for their input and keeps
/// the latest value of every output.
pub struct Dispatcher {
    dataset: Arc<Dataset>,
    selection: Selection,
    bindings: Vec<Binding>,
    outputs: BTreeMap<Output, OutputValue>,
}

impl Dispatcher {
    /// Dispatcher with the dashboard's map, table and trend handlers.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let mut dispatcher = Self::empty(dataset);
        dispatcher.register(Output::MapFigure, &[Input::YearSlider], map_handler);
        dispatcher.register(
            Output::DetailTable,
            &[Input::MapClick, Input::YearSlider],
            table_handler,
        );
        dispatcher.register(
            Output::TrendPlot,
            &[Input::MapClick, Input::YearSlider],
            trend_handler,
        );
        dispatcher
    }

    /// Dispatcher with no handlers and the initial selection.
    pub fn empty(dataset: Arc<Dataset>) -> Self {
        let selection = Selection::initial(&dataset);
        Dispatcher {
            dataset,
            selection,
            bindings: Vec::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Bind `handler` to `output`, triggered by any of `inputs`. The handler
    /// runs once immediately so the output has an initial value.
    pub fn register(&mut self, output: Output, inputs: &[Input], handler: Handler) {
        let value = handler(&self.dataset, &self.selection);
        self.outputs.insert(output, value);
        self.bindings.push(Binding {
            output,
            inputs: inputs.to_vec(),
            handler,
        });
    }

    /// Apply `event` to the selection and re-run every handler bound to its
    /// input. Returns the outputs that were recomputed.
    pub fn dispatch(&mut self, event: UiEvent) -> Vec<Output> {
        let input = event.input();
        log::debug!("dispatching {event:?}");
        self.selection.apply(event);

        let mut updated = Vec::new();
        for binding in self.bindings.iter().filter(|b| b.inputs.contains(&input)) {
            let value = (binding.handler)(&self.dataset, &self.selection);
            self.outputs.insert(binding.output, value);
            updated.push(binding.output);
        }
        log::debug!("recomputed {updated:?}");
        updated
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn output(&self, output: Output) -> Option<&OutputValue> {
        self.outputs.get(&output)
    }

    pub fn map(&self) -> Option<&MapFigure> {
        match self.output(Output::MapFigure) {
            Some(OutputValue::Map(fig)) => Some(fig),
            _ => None,
        }
    }

    pub fn table(&self) -> &TableView {
        match self.output(Output::DetailTable) {
            Some(OutputValue::Table(view)) => view,
            _ => &IDLE_TABLE,
        }
    }

    pub fn trend(&self) -> &[(i64, f64)] {
        match self.output(Output::TrendPlot) {
            Some(OutputValue::Trend(points)) => points,
            _ => &[],
        }
    }
}
