use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Cell, Col, Row, Table};

use crate::batch::Evaluation;

fn optional<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| "-".into())
}

pub fn tabulate(evaluations: &[Evaluation]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right).with(Separator(true))),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred).with(Separator(true))),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Matchup".into(),
                "Home".into(),
                "Away".into(),
                "Spread".into(),
                "P(win)".into(),
                "Winner".into(),
                "P(cover)".into(),
                "Coverer".into(),
            ],
        ));
    table.push_rows(evaluations.iter().map(|evaluation| {
        let result = &evaluation.result;
        Row::new(
            Styles::default(),
            vec![
                evaluation.matchup.matchup_id.clone().into(),
                evaluation.matchup.home_id.clone().into(),
                evaluation.matchup.away_id.clone().into(),
                optional(evaluation.spread, |spread| spread.to_string()).into(),
                Cell::new(Styles::default(), format!("{:.6}", result.win_probability).into()),
                result.predicted_winner.to_string().into(),
                optional(result.cover_probability, |prob| format!("{prob:.6}")).into(),
                optional(result.predicted_coverer, |side| side.to_string()).into(),
            ],
        )
    }));
    table
}
