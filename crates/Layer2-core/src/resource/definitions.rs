//! Static glossary served as `stat-definitions://v1`

pub const STAT_DEFINITIONS_MARKDOWN: &str = r#"# Baseball Statistics Definitions

## Batting Statistics

- **AVG** (Batting Average): hits divided by at-bats.
- **OBP** (On-Base Percentage): (H + BB + HBP) / (AB + BB + HBP + SF).
- **SLG** (Slugging Percentage): total bases divided by at-bats.
- **OPS** (On-Base Plus Slugging): OBP + SLG.
- **HR** (Home Runs): hits on which the batter rounds all bases.
- **RBI** (Runs Batted In): runs that score because of the batter's plate appearance.
- **SB** (Stolen Bases): bases advanced by the runner without a hit, walk or error.
- **BB%** (Walk Rate): walks per plate appearance.
- **K%** (Strikeout Rate): strikeouts per plate appearance.
- **ISO** (Isolated Power): SLG minus AVG.
- **BABIP** (Batting Average on Balls in Play): (H - HR) / (AB - K - HR + SF).
- **wOBA** (Weighted On-Base Average): on-base events weighted by run value.
- **wRC+** (Weighted Runs Created Plus): run creation scaled to league and park, 100 is average.
- **WAR** (Wins Above Replacement): total wins contributed over a replacement-level player.

## Pitching Statistics

- **ERA** (Earned Run Average): earned runs allowed per nine innings.
- **WHIP** (Walks plus Hits per Inning Pitched): (BB + H) / IP.
- **IP** (Innings Pitched): outs recorded divided by three.
- **K/9** (Strikeouts per Nine): strikeouts per nine innings.
- **BB/9** (Walks per Nine): walks per nine innings.
- **HR/9** (Home Runs per Nine): home runs allowed per nine innings.
- **FIP** (Fielding Independent Pitching): ERA estimate from strikeouts, walks, hit batters and home runs only.
- **xFIP** (Expected FIP): FIP with a league-average home run per fly ball rate.
- **SV** (Saves): games finished while protecting a lead under the save rule.
- **W / L** (Wins / Losses): decisions credited to the pitcher.

## Statcast

- **Exit Velocity** (`launch_speed`): speed of the ball off the bat, in mph.
- **Launch Angle** (`launch_angle`): vertical angle of the ball off the bat, in degrees.
- **Barrel**: batted ball whose exit velocity and launch angle historically produce at least a .500 AVG and 1.500 SLG.
- **Hard Hit**: batted ball with an exit velocity of 95 mph or more.
- **xBA** (`estimated_ba_using_speedangle`): expected batting average from exit velocity and launch angle.
- **xwOBA** (`estimated_woba_using_speedangle`): expected wOBA from exit velocity and launch angle.
- **Spin Rate** (`release_spin_rate`): rotations per minute of a pitch at release.
- **Release Speed** (`release_speed`): pitch velocity at release, in mph.
- **Pitch Type** (`pitch_type`): pitch classification such as FF (four-seam), SL (slider) or CH (changeup).
"#;
