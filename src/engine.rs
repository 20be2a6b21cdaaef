//! Prompt generation for the three modes.
//!
//! Each mode runs one generation process; the action only overrides or
//! decorates a line or two of its output.

use crate::form::FieldValues;
use crate::modes::{ActionId, ModeId};
use crate::pools;
use crate::random::{RandomSource, pick};

pub const START_HEADERS: [&str; 4] = ["故事方向", "冲突核心", "开场钩子", "落笔提示"];
pub const PUSH_HEADERS: [&str; 4] = ["诊断", "下一步行动候选", "代价", "建议优先选"];
pub const RESTART_HEADERS: [&str; 4] = ["当前核心矛盾", "强化版", "极端版", "情绪驱动写法"];

/// Generate the prompt block for `mode`, flavored by `action`.
///
/// Field values are read through `inputs`; every pool pick goes through `rng`.
pub fn generate<F, R>(mode: ModeId, action: ActionId, inputs: &F, rng: &mut R) -> String
where
    F: FieldValues + ?Sized,
    R: RandomSource + ?Sized,
{
    debug_assert_eq!(action.mode(), mode, "action {} outside its mode", action.tag());
    match mode {
        ModeId::Start => generate_start(action, inputs, rng),
        ModeId::Push => generate_push(action, inputs, rng),
        ModeId::Restart => generate_restart(action, inputs, rng),
    }
}

fn generate_start<F, R>(action: ActionId, inputs: &F, rng: &mut R) -> String
where
    F: FieldValues + ?Sized,
    R: RandomSource + ?Sized,
{
    if inputs.val("seed").is_empty() {
        return pools::SEED_GUIDANCE.to_string();
    }
    let lead = or_default(inputs.val("lead"), pools::DEFAULT_LEAD);
    let mood = match inputs.val("mood") {
        m if m.is_empty() => pick(rng, pools::DEFAULT_MOODS).to_string(),
        m => m,
    };
    let avoid = or_default(inputs.val("avoid"), pools::DEFAULT_AVOID);
    let vars = [
        ("lead", lead.as_str()),
        ("mood", mood.as_str()),
        ("avoid", avoid.as_str()),
    ];

    let mut directions: Vec<String> = (0..3)
        .map(|_| fill(*pick(rng, pools::DIRECTIONS), &vars))
        .collect();
    match action {
        ActionId::Hook => directions[0].push_str(pools::HOOK_SUFFIX),
        ActionId::FirstDrop => directions[1].push_str(pools::FIRST_DROP_SUFFIX),
        _ => {}
    }

    let conflict = fill(*pick(rng, pools::CONFLICTS), &vars);
    let hook = pick(rng, pools::HOOKS).to_string();
    let first_drop = fill(*pick(rng, pools::FIRST_DROPS), &vars);

    render(
        START_HEADERS,
        [numbered(&directions), conflict, hook, first_drop],
    )
}

fn generate_push<F, R>(action: ActionId, inputs: &F, rng: &mut R) -> String
where
    F: FieldValues + ?Sized,
    R: RandomSource + ?Sized,
{
    let progress = or_default(inputs.val("progress"), pools::DEFAULT_PROGRESS);
    let recent = or_default(inputs.val("recent"), pools::DEFAULT_RECENT);
    let goal = or_default(inputs.val("goal"), pools::DEFAULT_GOAL);
    let block_type = or_default(inputs.val("blockType"), pools::DEFAULT_BLOCK_TYPE);
    let vars = [
        ("progress", progress.as_str()),
        ("recent", recent.as_str()),
        ("goal", goal.as_str()),
    ];

    let mut candidates: Vec<String> = (0..5)
        .map(|_| fill(*pick(rng, pools::NEXT_STEPS), &vars))
        .collect();
    match action {
        ActionId::UpgradeConflict => candidates[0] = pools::ESCALATION_STEP.to_string(),
        ActionId::EasyPath => candidates[4] = pools::EASY_STEP.to_string(),
        _ => {}
    }

    let diagnosis = format!(
        "{}（卡点：{}）",
        fill(*pick(rng, pools::DIAGNOSES), &vars),
        block_type
    );
    let cost = pick(rng, pools::COSTS).to_string();

    render(
        PUSH_HEADERS,
        [
            diagnosis,
            numbered(&candidates),
            cost,
            priority_for(&block_type).to_string(),
        ],
    )
}

fn generate_restart<F, R>(action: ActionId, inputs: &F, rng: &mut R) -> String
where
    F: FieldValues + ?Sized,
    R: RandomSource + ?Sized,
{
    let one_line = or_default(inputs.val("oneLine"), pools::DEFAULT_ONE_LINE);
    let scene = or_default(inputs.val("scene"), pools::DEFAULT_SCENE);
    let worst = or_default(inputs.val("worst"), pools::DEFAULT_WORST);
    let vars = [
        ("oneLine", one_line.as_str()),
        ("scene", scene.as_str()),
        ("worst", worst.as_str()),
    ];

    let mut reinforced = fill(*pick(rng, pools::REINFORCED), &vars);
    let mut extreme = fill(*pick(rng, pools::EXTREMES), &vars);
    match action {
        ActionId::Amplify => reinforced.insert_str(0, pools::AMPLIFY_PREFIX),
        ActionId::Hardcore => extreme.insert_str(0, pools::HARDCORE_PREFIX),
        ActionId::EmotionSlice => reinforced.push_str(pools::EMOTION_SLICE_SUFFIX),
        _ => {}
    }

    let core = fill(*pick(rng, pools::CORES), &vars);
    let technique = pick(rng, pools::EMOTION_TECHNIQUES).to_string();

    render(RESTART_HEADERS, [core, reinforced, extreme, technique])
}

/// Canned suggestion for a block type; unknown types get the first row.
fn priority_for(block_type: &str) -> &'static str {
    pools::PRIORITIES
        .iter()
        .find(|(key, _)| *key == block_type)
        .unwrap_or(&pools::PRIORITIES[0])
        .1
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Substitute `{name}` placeholders in one pass over the template.
///
/// Substituted values are copied verbatim, so braces typed by the user are
/// never expanded. Unknown `{...}` sequences are left as they are.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match known {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn numbered(lines: &[String]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render(headers: [&str; 4], bodies: [String; 4]) -> String {
    headers
        .iter()
        .zip(bodies.iter())
        .map(|(header, body)| format!("【{header}】\n{body}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;
    use crate::random::ScriptedRandom;
    use std::collections::HashMap;

    fn headers(mode: ModeId) -> [&'static str; 4] {
        match mode {
            ModeId::Start => START_HEADERS,
            ModeId::Push => PUSH_HEADERS,
            ModeId::Restart => RESTART_HEADERS,
        }
    }

    fn blank() -> HashMap<&'static str, &'static str> {
        HashMap::new()
    }

    /// Body lines under `header`, up to the next blank line.
    fn section<'a>(output: &'a str, header: &str) -> Vec<&'a str> {
        let marker = format!("【{header}】");
        output
            .split("\n\n")
            .find_map(|block| block.strip_prefix(marker.as_str()))
            .map(|body| body.trim_start_matches('\n').lines().collect())
            .unwrap_or_default()
    }

    fn header_positions(output: &str) -> Vec<&str> {
        output
            .lines()
            .filter_map(|l| l.strip_prefix('【').and_then(|l| l.strip_suffix('】')))
            .collect()
    }

    #[test]
    fn test_blank_inputs_produce_all_headers_in_order() {
        let mut rng = rand::rng();
        let cases = [
            (ModeId::Push, ActionId::NextFive),
            (ModeId::Restart, ActionId::Amplify),
        ];
        for (mode, action) in cases {
            let out = generate(mode, action, &blank(), &mut rng);
            assert_eq!(header_positions(&out), headers(mode).to_vec());
            assert!(!out.contains('{') && !out.contains('}'), "{out}");
        }

        let mut inputs = blank();
        inputs.insert("seed", "一封信");
        let out = generate(ModeId::Start, ActionId::ThreeWays, &inputs, &mut rng);
        assert_eq!(header_positions(&out), START_HEADERS.to_vec());
        assert!(!out.contains('{') && !out.contains('}'), "{out}");
    }

    #[test]
    fn test_every_action_resolves_all_placeholders() {
        let mut rng = rand::rng();
        let mut inputs = blank();
        inputs.insert("seed", "种子");
        for action in ActionId::ALL {
            for _ in 0..30 {
                let out = generate(action.mode(), action, &inputs, &mut rng);
                assert!(!out.contains('{'), "{}: {out}", action.tag());
                assert_eq!(out.matches('【').count(), 4);
            }
        }
    }

    #[test]
    fn test_empty_seed_returns_guidance() {
        let mut rng = rand::rng();
        let mut inputs = blank();
        inputs.insert("lead", "L");
        inputs.insert("mood", "M");
        inputs.insert("seed", "   ");
        for action in [ActionId::ThreeWays, ActionId::Hook, ActionId::FirstDrop] {
            let out = generate(ModeId::Start, action, &inputs, &mut rng);
            assert_eq!(out, pools::SEED_GUIDANCE);
        }
    }

    #[test]
    fn test_start_directions_interpolate_lead() {
        let mut rng = rand::rng();
        let mut inputs = blank();
        inputs.insert("seed", "X");
        inputs.insert("lead", "L");
        for _ in 0..20 {
            let out = generate(ModeId::Start, ActionId::ThreeWays, &inputs, &mut rng);
            let directions = section(&out, "故事方向");
            assert_eq!(directions.len(), 3);
            for (i, line) in directions.iter().enumerate() {
                assert!(line.starts_with(&format!("{}. ", i + 1)));
                assert!(line.contains('L'));
                assert!(!line.contains(pools::DEFAULT_LEAD));
            }
        }
    }

    #[test]
    fn test_start_blank_lead_uses_default() {
        let mut rng = ScriptedRandom::new(&[]);
        let mut inputs = blank();
        inputs.insert("seed", "X");
        let out = generate(ModeId::Start, ActionId::ThreeWays, &inputs, &mut rng);
        assert!(section(&out, "故事方向")[0].contains(pools::DEFAULT_LEAD));
    }

    #[test]
    fn test_hook_suffix_on_first_direction() {
        let mut rng = rand::rng();
        let mut inputs = blank();
        inputs.insert("seed", "X");
        inputs.insert("lead", "L");
        for _ in 0..20 {
            let out = generate(ModeId::Start, ActionId::Hook, &inputs, &mut rng);
            let directions = section(&out, "故事方向");
            assert!(directions[0].ends_with(pools::HOOK_SUFFIX));
            assert!(!directions[1].ends_with(pools::FIRST_DROP_SUFFIX));
        }
    }

    #[test]
    fn test_first_drop_suffix_on_second_direction() {
        let mut rng = rand::rng();
        let mut inputs = blank();
        inputs.insert("seed", "X");
        for _ in 0..20 {
            let out = generate(ModeId::Start, ActionId::FirstDrop, &inputs, &mut rng);
            let directions = section(&out, "故事方向");
            assert!(directions[1].ends_with(pools::FIRST_DROP_SUFFIX));
            assert!(!directions[0].ends_with(pools::HOOK_SUFFIX));
        }
    }

    #[test]
    fn test_start_scripted_picks() {
        // mood default, 3 directions, conflict, hook, first drop
        let mut rng = ScriptedRandom::new(&[1, 3, 0, 2, 0, 2, 0]);
        let mut inputs = blank();
        inputs.insert("seed", "X");
        inputs.insert("lead", "阿遥");
        inputs.insert("avoid", "说教");
        let out = generate(ModeId::Start, ActionId::ThreeWays, &inputs, &mut rng);

        let expected = "【故事方向】\n\
            1. 阿遥受邀回到儿时小镇，却发现街口花店的橱窗每天都提前摆出明天会凋谢的花。\n\
            2. 雨夜里，阿遥捡到一封写给未来自己的信，信里点名今夜必须错过某个人。\n\
            3. 一场订婚前夜的停电，让阿遥听见墙里有人低声念出自己的真名。\n\n\
            【冲突核心】\n想要轻甜微疼的亲密，却被“说教”式的命运推向误解。\n\n\
            【开场钩子】\n那封信最后一句写着：天亮前别去看海，否则你会爱上不该回来的人。\n\n\
            【落笔提示】\n第一段从“身体感受”起笔：指尖、气味、光线，把轻甜微疼落在一个动作上。";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_start_user_mood_skips_default_draw() {
        // With mood supplied, the first scripted index goes to the directions.
        let mut rng = ScriptedRandom::new(&[2, 2, 2]);
        let mut inputs = blank();
        inputs.insert("seed", "X");
        inputs.insert("mood", "酸涩");
        let out = generate(ModeId::Start, ActionId::ThreeWays, &inputs, &mut rng);
        assert!(section(&out, "故事方向")[0].contains("订婚前夜"));
        assert!(section(&out, "落笔提示")[0].contains("酸涩"));
    }

    #[test]
    fn test_push_dialogue_priority_is_fixed() {
        let mut rng = rand::rng();
        let mut inputs = blank();
        inputs.insert("blockType", "对话");
        for action in [ActionId::NextFive, ActionId::UpgradeConflict, ActionId::EasyPath] {
            for _ in 0..10 {
                let out = generate(ModeId::Push, action, &inputs, &mut rng);
                assert_eq!(
                    section(&out, "建议优先选"),
                    vec!["先选“安静角色说真话”那条，对话层次最容易爆开。"]
                );
                assert!(section(&out, "诊断")[0].ends_with("（卡点：对话）"));
            }
        }
    }

    #[test]
    fn test_push_unknown_block_type_falls_back() {
        let mut rng = rand::rng();
        let mut inputs = blank();
        inputs.insert("blockType", "其他");
        let out = generate(ModeId::Push, ActionId::NextFive, &inputs, &mut rng);
        assert_eq!(section(&out, "建议优先选"), vec![pools::PRIORITIES[0].1]);
        assert!(section(&out, "诊断")[0].ends_with("（卡点：其他）"));
    }

    #[test]
    fn test_push_blank_block_type_uses_default() {
        let mut rng = rand::rng();
        let out = generate(ModeId::Push, ActionId::NextFive, &blank(), &mut rng);
        assert!(section(&out, "诊断")[0].ends_with("（卡点：推进）"));
    }

    #[test]
    fn test_upgrade_conflict_overrides_first_candidate() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let out = generate(ModeId::Push, ActionId::UpgradeConflict, &blank(), &mut rng);
            let candidates = section(&out, "下一步行动候选");
            assert_eq!(candidates.len(), 5);
            assert_eq!(candidates[0], format!("1. {}", pools::ESCALATION_STEP));
        }
    }

    #[test]
    fn test_easy_path_overrides_fifth_candidate() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let out = generate(ModeId::Push, ActionId::EasyPath, &blank(), &mut rng);
            let candidates = section(&out, "下一步行动候选");
            assert_eq!(candidates[4], format!("5. {}", pools::EASY_STEP));
        }
    }

    #[test]
    fn test_push_scripted_picks_interpolate() {
        // 5 candidates, diagnosis, cost
        let mut rng = ScriptedRandom::new(&[2, 4, 0, 0, 0, 0, 1]);
        let mut inputs = blank();
        inputs.insert("progress", "第十章");
        inputs.insert("recent", "拍卖会");
        inputs.insert("goal", "揭开身世");
        let out = generate(ModeId::Push, ActionId::NextFive, &inputs, &mut rng);

        assert_eq!(
            section(&out, "诊断"),
            vec!["第十章却停在“情绪已满、行动不足”的缝隙里。（卡点：推进）"]
        );
        let candidates = section(&out, "下一步行动候选");
        assert_eq!(candidates[0], "1. 把“揭开身世”拆成一次失败会立刻付出代价的小行动。");
        assert_eq!(
            candidates[1],
            "2. 把拍卖会的结果反转：看似赢下局面，实则失去更重要筹码。"
        );
        assert_eq!(section(&out, "代价"), vec![pools::COSTS[1]]);
    }

    #[test]
    fn test_amplify_prefixes_reinforced() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let out = generate(ModeId::Restart, ActionId::Amplify, &blank(), &mut rng);
            assert!(section(&out, "强化版")[0].starts_with(pools::AMPLIFY_PREFIX));
            assert!(!section(&out, "极端版")[0].starts_with(pools::HARDCORE_PREFIX));
        }
    }

    #[test]
    fn test_hardcore_prefixes_extreme() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let out = generate(ModeId::Restart, ActionId::Hardcore, &blank(), &mut rng);
            let extreme = section(&out, "极端版")[0];
            assert!(extreme.starts_with("再狠一层：最狠版本："));
            assert!(!section(&out, "强化版")[0].starts_with(pools::AMPLIFY_PREFIX));
        }
    }

    #[test]
    fn test_emotion_slice_suffixes_reinforced() {
        let mut rng = rand::rng();
        let out = generate(ModeId::Restart, ActionId::EmotionSlice, &blank(), &mut rng);
        assert!(section(&out, "强化版")[0].ends_with(pools::EMOTION_SLICE_SUFFIX));
    }

    #[test]
    fn test_restart_scripted_picks_interpolate() {
        // reinforced, extreme, core, technique
        let mut rng = ScriptedRandom::new(&[0, 0, 0, 2]);
        let mut inputs = blank();
        inputs.insert("oneLine", "她要回家");
        inputs.insert("scene", "车站告别");
        let out = generate(ModeId::Restart, ActionId::Amplify, &inputs, &mut rng);

        assert_eq!(
            section(&out, "当前核心矛盾"),
            vec!["“她要回家”与“活得体面”正在互相撕扯。"]
        );
        assert_eq!(
            section(&out, "强化版"),
            vec!["把矛盾公开化：把“车站告别”提前到中段重演一次，但这次有人录下全部真相。"]
        );
        assert_eq!(
            section(&out, "极端版"),
            vec![format!("最狠版本：主角亲手达成了{}，并且无人替她辩白。", pools::DEFAULT_WORST)]
        );
        assert_eq!(section(&out, "情绪驱动写法"), vec![pools::EMOTION_TECHNIQUES[2]]);
    }

    #[test]
    fn test_structure_is_stable_across_calls() {
        let mut form = FormState::for_mode(ModeId::Push);
        form.set("goal", "G");
        let mut rng = rand::rng();
        let shape = |out: &str| -> Vec<usize> {
            out.split("\n\n").map(|block| block.lines().count()).collect()
        };
        let first = generate(ModeId::Push, ActionId::NextFive, &form, &mut rng);
        for _ in 0..20 {
            let next = generate(ModeId::Push, ActionId::NextFive, &form, &mut rng);
            assert_eq!(shape(&next), shape(&first));
            assert_eq!(header_positions(&next), header_positions(&first));
        }
    }

    #[test]
    fn test_form_state_drives_generation() {
        let mut form = FormState::for_mode(ModeId::Start);
        let mut rng = rand::rng();
        assert_eq!(
            generate(ModeId::Start, ActionId::Hook, &form, &mut rng),
            pools::SEED_GUIDANCE
        );
        form.set("seed", "灯塔");
        let out = generate(ModeId::Start, ActionId::Hook, &form, &mut rng);
        assert!(out.starts_with("【故事方向】\n1. "));
    }

    #[test]
    fn test_fill_replaces_every_occurrence() {
        assert_eq!(fill("{a}-{a}-{b}", &[("a", "x"), ("b", "y")]), "x-x-y");
        assert_eq!(fill("no vars", &[("a", "x")]), "no vars");
    }

    #[test]
    fn test_fill_does_not_expand_substituted_values() {
        let vars = [("a", "{b}"), ("b", "B")];
        assert_eq!(fill("{a}-{b}", &vars), "{b}-B");
        assert_eq!(fill("{b}{a}", &vars), "B{b}");
    }

    #[test]
    fn test_fill_keeps_unknown_and_unclosed_braces() {
        assert_eq!(fill("{x} and {a}", &[("a", "1")]), "{x} and 1");
        assert_eq!(fill("open { only", &[("a", "1")]), "open { only");
        assert_eq!(fill("{a", &[("a", "1")]), "{a");
    }

    #[test]
    fn test_braces_in_user_input_survive_verbatim() {
        let mut rng = ScriptedRandom::new(&[]);
        let mut inputs = blank();
        inputs.insert("seed", "X");
        inputs.insert("lead", "{avoid}");
        inputs.insert("mood", "{lead}");
        inputs.insert("avoid", "AV");
        let out = generate(ModeId::Start, ActionId::ThreeWays, &inputs, &mut rng);

        let expected = fill(pools::DIRECTIONS[0], &[("lead", "{avoid}")]);
        let directions = section(&out, "故事方向");
        assert_eq!(directions[0], format!("1. {}", expected));
        assert!(directions.iter().all(|line| line.contains("{avoid}")));
        assert!(!directions.iter().any(|line| line.contains("AV")));
    }

    #[test]
    fn test_push_braces_in_goal_survive_verbatim() {
        // index 2 of the next-step pool interpolates {goal}
        let mut rng = ScriptedRandom::new(&[2, 2, 2, 2, 2]);
        let mut inputs = blank();
        inputs.insert("goal", "{recent}");
        inputs.insert("recent", "R");
        let out = generate(ModeId::Push, ActionId::NextFive, &inputs, &mut rng);
        let candidates = section(&out, "下一步行动候选");
        assert!(candidates.iter().all(|line| line.contains("{recent}")));
    }

    #[test]
    fn test_priority_lookup() {
        assert_eq!(priority_for("节奏"), pools::PRIORITIES[3].1);
        assert_eq!(priority_for(""), pools::PRIORITIES[0].1);
    }
}
