use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::config::{read_bool, read_integer, read_number};
use crate::*;

/// Outcome of a round as submitted with the results form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// `1` when the bomb was collected, `0` otherwise; the results form stores it as an integer.
    pub bomb: u8,
    pub bomb_row: Coord,
    pub bomb_col: Coord,
    pub boxes_collected: CellCount,
    pub boxes_scheme: Vec<Cell>,
}

impl RoundRecord {
    pub fn from_task<S, T>(task: &BombTask<S, T>) -> Self {
        let bomb = task.bomb();
        Self {
            bomb: task.has_bomb().into(),
            bomb_row: bomb.row,
            bomb_col: bomb.col,
            boxes_collected: task.collected_count(),
            boxes_scheme: task.collection().cells().to_vec(),
        }
    }

    pub const fn bomb_collected(&self) -> bool {
        self.bomb != 0
    }
}

/// How collected boxes turn into earnings over a sequence of rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffRule {
    /// Earnings per collected box when the bomb was avoided.
    pub box_value: f64,
    pub num_rounds: u16,
    /// Pay a single randomly chosen round instead of the sum of all rounds.
    pub random_payoff: bool,
}

impl Default for PayoffRule {
    fn default() -> Self {
        Self {
            box_value: 1.0,
            num_rounds: 1,
            random_payoff: true,
        }
    }
}

impl PayoffRule {
    pub fn load(source: &impl ConfigSource) -> Result<Self> {
        let defaults = Self::default();
        let box_value = read_number(source, "boxValue", defaults.box_value)?;
        if !box_value.is_finite() || box_value < 0.0 {
            return Err(TaskError::configuration(
                "boxValue",
                "must be a non-negative number",
            ));
        }
        let num_rounds = read_integer(
            source,
            "numRounds",
            defaults.num_rounds.into(),
            u16::MAX.into(),
        )?;
        Ok(Self {
            box_value,
            // bounded by u16::MAX above
            num_rounds: num_rounds as u16,
            random_payoff: read_bool(source, "randomPayoff", defaults.random_payoff)?,
        })
    }

    /// Potential earnings of a single round: nothing if the bomb was collected.
    pub fn round_result(&self, record: &RoundRecord) -> f64 {
        if record.bomb_collected() {
            0.0
        } else {
            f64::from(record.boxes_collected) * self.box_value
        }
    }

    /// Draws the 1-based round that gets paid out.
    pub fn choose_round_to_pay<R>(&self, rng: &mut R) -> u16
    where
        R: RandomSource + ?Sized,
    {
        let num_rounds = usize::from(self.num_rounds.max(1));
        // within 1..=num_rounds
        rng.uniform_int(1, num_rounds) as u16
    }

    /// Payoff per round, in round order.
    pub fn payoffs(&self, records: &[RoundRecord], round_to_pay: u16) -> Vec<f64> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let paid = !self.random_payoff || index + 1 == usize::from(round_to_pay);
                if paid { self.round_result(record) } else { 0.0 }
            })
            .collect()
    }

    pub fn total_payoff(&self, records: &[RoundRecord], round_to_pay: u16) -> f64 {
        self.payoffs(records, round_to_pay).into_iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use serde_json::json;

    fn record(bomb: u8, boxes_collected: CellCount) -> RoundRecord {
        RoundRecord {
            bomb,
            bomb_row: 1,
            bomb_col: 1,
            boxes_collected,
            boxes_scheme: Vec::new(),
        }
    }

    #[test]
    fn record_reflects_task() {
        let config = TaskConfig {
            rows: 2,
            cols: 2,
            ..Default::default()
        };
        let mut task = BombTask::new(
            config,
            MemoryStore::new(),
            ManualScheduler::new(),
            &mut ScriptedRandom::new(&[0, 1]),
        )
        .unwrap();
        task.toggle(Cell::new(2, 1), true);
        task.toggle(Cell::new(1, 2), true);

        let record = RoundRecord::from_task(&task);

        assert_eq!(record.bomb, 1);
        assert_eq!((record.bomb_row, record.bomb_col), (1, 2));
        assert_eq!(record.boxes_collected, 2);
        assert_eq!(record.boxes_scheme, vec![Cell::new(2, 1), Cell::new(1, 2)]);
    }

    #[test]
    fn bomb_wipes_out_round_result() {
        let rule = PayoffRule {
            box_value: 0.5,
            ..Default::default()
        };

        assert_eq!(rule.round_result(&record(0, 12)), 6.0);
        assert_eq!(rule.round_result(&record(1, 12)), 0.0);
    }

    #[test]
    fn random_payoff_pays_one_round() {
        let rule = PayoffRule {
            box_value: 1.0,
            num_rounds: 3,
            random_payoff: true,
        };
        let records = [record(0, 10), record(0, 20), record(1, 30)];

        assert_eq!(rule.payoffs(&records, 2), vec![0.0, 20.0, 0.0]);
        assert_eq!(rule.total_payoff(&records, 3), 0.0);
    }

    #[test]
    fn summed_payoff_pays_every_round() {
        let rule = PayoffRule {
            box_value: 2.0,
            num_rounds: 2,
            random_payoff: false,
        };
        let records = [record(0, 3), record(0, 4)];

        assert_eq!(rule.total_payoff(&records, 1), 14.0);
    }

    #[test]
    fn round_to_pay_is_within_rounds() {
        let rule = PayoffRule {
            num_rounds: 5,
            ..Default::default()
        };
        let mut rng = SeededRandom::new(3);

        for _ in 0..100 {
            assert!((1..=5).contains(&rule.choose_round_to_pay(&mut rng)));
        }
        assert_eq!(rule.choose_round_to_pay(&mut ScriptedRandom::new(&[4])), 4);
    }

    #[test]
    fn loads_from_settings() {
        let rule = PayoffRule::load(&json!({"boxValue": 0.25, "numRounds": 5})).unwrap();

        assert_eq!(
            rule,
            PayoffRule {
                box_value: 0.25,
                num_rounds: 5,
                random_payoff: true,
            }
        );
        assert!(matches!(
            PayoffRule::load(&json!({"boxValue": -1})),
            Err(TaskError::Configuration { key: "boxValue", .. })
        ));
    }
}
