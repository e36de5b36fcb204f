//! Screen and widget events raised by the host's UI layer

use crate::outcome::InputResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenArgs {
    pub screen_id: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenInitArgs {
    pub screen_id: i64,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenRenderArgs {
    pub screen_id: i64,
    pub mouse_x: i32,
    pub mouse_y: i32,
    pub partial_tick: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyArgs {
    pub screen_id: i64,
    pub key_code: i32,
    pub scan_code: i32,
    pub modifiers: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CharTypedArgs {
    pub screen_id: i64,
    pub code_point: u32,
    pub modifiers: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseButtonArgs {
    pub screen_id: i64,
    pub mouse_x: f64,
    pub mouse_y: f64,
    pub button: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseDragArgs {
    pub screen_id: i64,
    pub mouse_x: f64,
    pub mouse_y: f64,
    pub button: i32,
    pub drag_x: f64,
    pub drag_y: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseScrollArgs {
    pub screen_id: i64,
    pub mouse_x: f64,
    pub mouse_y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetArgs {
    pub screen_id: i64,
    pub widget_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct WidgetTextChangedArgs {
    pub screen_id: i64,
    pub widget_id: i64,
    pub text: String,
}

events! {
    ScreenInit(ScreenInitArgs) -> () = ();
    ScreenTick(ScreenArgs) -> () = ();
    ScreenRender(ScreenRenderArgs) -> () = ();
    ScreenClose(ScreenArgs) -> () = ();
    ScreenKeyPressed(KeyArgs) -> InputResult = InputResult::NotHandled;
    ScreenKeyReleased(KeyArgs) -> InputResult = InputResult::NotHandled;
    ScreenCharTyped(CharTypedArgs) -> InputResult = InputResult::NotHandled;
    ScreenMouseClicked(MouseButtonArgs) -> InputResult = InputResult::NotHandled;
    ScreenMouseReleased(MouseButtonArgs) -> InputResult = InputResult::NotHandled;
    ScreenMouseDragged(MouseDragArgs) -> InputResult = InputResult::NotHandled;
    ScreenMouseScrolled(MouseScrollArgs) -> InputResult = InputResult::NotHandled;

    WidgetPressed(WidgetArgs) -> () = ();
    WidgetTextChanged(WidgetTextChangedArgs) -> () = ();
}
