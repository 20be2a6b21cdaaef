//! Literal text pools the engine samples from.
//!
//! Placeholders in braces are filled in after a line is picked. Every pool
//! must stay non-empty.

/// Returned instead of the four sections when the start seed is empty.
pub const SEED_GUIDANCE: &str = "请先写下故事种子，哪怕只是一句心动瞬间也可以。";

// Start mode

pub const DEFAULT_LEAD: &str = "一位把秘密缝进衣角的人";
pub const DEFAULT_AVOID: &str = "脸谱化反派";
pub const DEFAULT_MOODS: &[&str] = &["潮湿暧昧", "轻甜微疼", "安静汹涌"];

pub const DIRECTIONS: &[&str] = &[
    "雨夜里，{lead}捡到一封写给未来自己的信，信里点名今夜必须错过某个人。",
    "{lead}在旧城图书馆的夹层里，发现每一本书都在记录同一场尚未发生的告别。",
    "一场订婚前夜的停电，让{lead}听见墙里有人低声念出自己的真名。",
    "{lead}受邀回到儿时小镇，却发现街口花店的橱窗每天都提前摆出明天会凋谢的花。",
];

pub const CONFLICTS: &[&str] = &[
    "想要{mood}的亲密，却被“{avoid}”式的命运推向误解。",
    "越想守住珍贵关系，越被迫在诚实和保护之间切割自己。",
    "每一次靠近真相，都会让主角失去一段真实记忆。",
];

pub const HOOKS: &[&str] = &[
    "她在婚纱试衣镜里看见自己穿着丧服，而身后站着昨天刚死去的人。",
    "凌晨三点，城市广播突然播报了她尚未说出口的分手台词。",
    "那封信最后一句写着：天亮前别去看海，否则你会爱上不该回来的人。",
];

pub const FIRST_DROPS: &[&str] = &[
    "第一段从“身体感受”起笔：指尖、气味、光线，把{mood}落在一个动作上。",
    "先写主角最平常的一件小事，再让异样感像涟漪一样慢慢扩开。",
    "开头三句只做一件事：让读者看见她正在失去什么。",
];

pub const HOOK_SUFFIX: &str = "（以钩子为第一句落下）";
pub const FIRST_DROP_SUFFIX: &str = "（第二段立即推进关系张力）";

// Push mode

pub const DEFAULT_PROGRESS: &str = "故事进行到中段";
pub const DEFAULT_RECENT: &str = "两人刚建立脆弱同盟";
pub const DEFAULT_GOAL: &str = "让关系和主线同时推进";
pub const DEFAULT_BLOCK_TYPE: &str = "推进";

pub const DIAGNOSES: &[&str] = &[
    "{progress}却停在“情绪已满、行动不足”的缝隙里。",
    "目前段落的能量集中在回忆，现实动作不够锋利。",
    "读者已感到风暴将至，但关键选择还没真正发生。",
];

pub const NEXT_STEPS: &[&str] = &[
    "主角误把盟友当成背叛者，当晚做出会引发连锁后果的决定。",
    "反派不出现，只送来一件旧物，迫使主角承认过去的谎言。",
    "把“{goal}”拆成一次失败会立刻付出代价的小行动。",
    "让最安静的配角说出最锋利的一句真话，关系格局立刻改写。",
    "把{recent}的结果反转：看似赢下局面，实则失去更重要筹码。",
    "下一幕直接切到不可撤销时刻，省去过渡解释。",
    "安排一次被迫合作，把旧矛盾装进同一辆失控列车。",
];

pub const COSTS: &[&str] = &[
    "代价是：主角保住目标，却在亲密关系里留下无法修复的裂纹。",
    "代价是：推进了外部事件，但主角必须亲手放弃一个旧誓言。",
    "代价是：真相更近一步，同时失去最信任她的人。",
];

/// Priority suggestion per block type. The first row doubles as the fallback.
pub const PRIORITIES: &[(&str, &str)] = &[
    ("推进", "先选“不可撤销时刻”那条，段落速度会立刻拉起。"),
    ("冲突", "先选“旧物触发谎言”那条，冲突会更贴身更痛。"),
    ("动机", "先选“失败即代价的小行动”那条，人物动机会更清晰。"),
    ("节奏", "先选“删过渡直切现场”那条，节奏会变得干净有力。"),
    ("对话", "先选“安静角色说真话”那条，对话层次最容易爆开。"),
];

pub const ESCALATION_STEP: &str =
    "主角最想守住的人主动站到对立面，冲突从事件升级为立场决裂。";
pub const EASY_STEP: &str = "把大场面缩成“二人对峙 + 一件证据”，最省笔力却最见火花。";

// Restart mode

pub const DEFAULT_ONE_LINE: &str = "一个人为了守住爱，必须先承认自己并不无辜";
pub const DEFAULT_SCENE: &str = "雨夜天台的拥抱与沉默";
pub const DEFAULT_WORST: &str = "主角失去所有重要关系，只剩迟来的真相";

pub const CORES: &[&str] = &[
    "“{oneLine}”与“活得体面”正在互相撕扯。",
    "主角渴望被理解，却一直用最容易被误读的方式求救。",
    "爱与自我保护不是二选一，而是同一把双刃。",
];

pub const REINFORCED: &[&str] = &[
    "把“{scene}”提前到中段重演一次，但这次有人录下全部真相。",
    "把隐藏秘密改成“所有人都知道，只有主角不敢承认”。",
    "让失败后果从个人痛感，扩大为整个家庭或群体的崩塌。",
];

pub const EXTREMES: &[&str] = &[
    "最狠版本：主角亲手达成了{worst}，并且无人替她辩白。",
    "最狠版本：她终于赢了目标，却发现自己成了当初最厌恶的人。",
    "最狠版本：想救的人活下来了，但从此再也不愿叫她的名字。",
];

pub const EMOTION_TECHNIQUES: &[&str] = &[
    "情绪片段以“动作-停顿-错觉”三拍写法：先写身体本能，再写不敢承认的念头，最后落在一句反常台词。",
    "片段从环境噪音切入，让风声、门响、呼吸压过对白，再用一句短句刺穿。",
    "让角色做一件与情绪相反的小动作，例如笑着整理袖口，却在下一秒掐破掌心。",
];

pub const AMPLIFY_PREFIX: &str = "把矛盾公开化：";
pub const HARDCORE_PREFIX: &str = "再狠一层：";
pub const EMOTION_SLICE_SUFFIX: &str = "（紧接一段高压情绪独白）";
