/// Episode stats of a [`Scenario`](crate::Scenario).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioStat {
    /// The number of ticks.
    pub ticks: usize,

    /// The number of agents which touched a hazard.
    pub deaths: usize,

    /// The number of agents which touched the goal.
    pub goals: usize,

    /// The number of collected collectibles.
    pub collectibles: usize,

    /// The number of finished training rounds.
    pub rounds: usize,
}

impl ScenarioStat {
    /// Returns a formatted string.
    pub fn fmt(&self) -> String {
        let mut s = "ticks, deaths, goals, collectibles, rounds\n".to_string();
        s += format!(
            "{}, {}, {}, {}, {}\n",
            self.ticks, self.deaths, self.goals, self.collectibles, self.rounds
        )
        .as_str();
        s
    }
}
