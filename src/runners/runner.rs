// Copyright @yucwang 2026

use crate::core::model::DustModel;
use crate::core::tally::RunTally;

pub trait Runner {
    fn run(&self, model: &DustModel) -> RunTally;
}
